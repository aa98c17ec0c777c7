//! Compiled-in layout catalog.
//!
//! Every template owns a fixed canvas size, the number of photos a session must capture for it,
//! and a draw routine expressed over [`DrawContext`] primitives.

mod catalog;
pub mod shapes;

use crate::{
    compose::compositor::DrawContext,
    foundation::{
        core::{Canvas, TemplateId},
        error::{BoothError, BoothResult},
    },
};

pub type DrawFn = fn(&mut DrawContext<'_>) -> BoothResult<()>;

pub struct Template {
    pub id: TemplateId,
    pub name: &'static str,
    pub tag: &'static str,
    pub description: &'static str,
    pub width: u32,
    pub height: u32,
    pub required_photos: usize,
    /// The background color can be replaced through `ComposeOptions::background`.
    pub replaceable_background: bool,
    /// Draws seeded pseudo-random decoration; output depends on `ComposeOptions::seed`.
    pub seeded_decoration: bool,
    draw: DrawFn,
}

impl Template {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Same images and options always give the same bytes; seeded templates qualify only
    /// when the seed is fixed.
    pub fn is_deterministic(&self) -> bool {
        !self.seeded_decoration
    }

    pub fn draw(&self, dc: &mut DrawContext<'_>) -> BoothResult<()> {
        (self.draw)(dc)
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("required_photos", &self.required_photos)
            .finish_non_exhaustive()
    }
}

/// Look up a template by id.
pub fn get_template(id: TemplateId) -> BoothResult<&'static Template> {
    catalog::TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .ok_or(BoothError::InvalidTemplate(id))
}

/// All templates in display order.
pub fn list_templates() -> &'static [Template] {
    &catalog::TEMPLATES
}

#[cfg(test)]
#[path = "../../tests/unit/templates/registry.rs"]
mod tests;
