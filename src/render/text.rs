use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, LazyLock},
};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Point, Rgba8, Vec2},
        error::{BoothError, BoothResult},
    },
    render::canvas::Surface,
};

/// Typeface family requested by a template; resolved through the [`FontBook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Sans,
    Serif,
    Mono,
    Display,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub size_px: f32,
    pub color: Rgba8,
    pub align: TextAlign,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub fn new(role: FontRole, size_px: f32, color: Rgba8) -> Self {
        Self {
            role,
            size_px,
            color,
            align: TextAlign::Center,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub fn align(self, align: TextAlign) -> Self {
        Self { align, ..self }
    }
}

/// Brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// DejaVu Sans, used when no configured font covers a role.
static BUNDLED_SANS: LazyLock<Arc<Vec<u8>>> =
    LazyLock::new(|| Arc::new(include_bytes!("../../assets/fonts/DejaVuSans.ttf").to_vec()));

/// Lookup order for roles without a font of their own.
const FALLBACK_ORDER: [FontRole; 4] = [
    FontRole::Sans,
    FontRole::Display,
    FontRole::Serif,
    FontRole::Mono,
];

/// Font files by role.
///
/// A role without a font takes the first configured role in `Sans, Display, Serif, Mono`
/// order, then the bundled DejaVu Sans.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    fonts: HashMap<FontRole, Arc<Vec<u8>>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: FontRole, bytes: Vec<u8>) {
        self.fonts.insert(role, Arc::new(bytes));
    }

    pub fn load(&mut self, role: FontRole, path: &Path) -> BoothResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.insert(role, bytes);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn resolve(&self, role: FontRole) -> Arc<Vec<u8>> {
        self.fonts
            .get(&role)
            .or_else(|| FALLBACK_ORDER.iter().find_map(|r| self.fonts.get(r)))
            .cloned()
            .unwrap_or_else(|| BUNDLED_SANS.clone())
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Shape a single line of text with the family found in `font_bytes`.
    pub fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &Arc<Vec<u8>>,
        style: &TextStyle,
    ) -> BoothResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(BoothError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(style.color.into()));
        if style.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn family_for(&mut self, font_bytes: &Arc<Vec<u8>>) -> BoothResult<String> {
        let key = Arc::as_ptr(font_bytes) as usize;
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            BoothError::validation("no font families registered from font bytes")
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BoothError::validation("registered font family has no name"))?
            .to_string();
        self.families.insert(key, name.clone());
        Ok(name)
    }
}

/// Lays out and paints text runs onto a [`Surface`].
pub struct TextPainter {
    fonts: FontBook,
    engine: TextLayoutEngine,
    font_data: HashMap<usize, vello_cpu::peniko::FontData>,
}

impl TextPainter {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
            font_data: HashMap::new(),
        }
    }

    /// Draw `text` with its alphabetic baseline at `anchor.y`; `anchor.x` is the left edge,
    /// center or right edge depending on the alignment.
    pub fn draw(
        &mut self,
        surface: &mut Surface,
        text: &str,
        anchor: Point,
        style: &TextStyle,
    ) -> BoothResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let bytes = self.fonts.resolve(style.role);

        let layout = self.engine.layout_line(text, &bytes, style)?;
        let font = self
            .font_data
            .entry(Arc::as_ptr(&bytes) as usize)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                    0,
                )
            })
            .clone();

        let mut glyphs = Vec::new();
        let mut font_size = style.size_px;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                font_size = run.run().font_size();
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        let Some(baseline) = glyphs.first().map(|g| f64::from(g.y)) else {
            return Ok(());
        };

        let width = f64::from(layout.width());
        let dx = match style.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => -width,
        };
        let offset = Vec2::new(anchor.x + dx, anchor.y - baseline);
        surface.fill_glyphs(&font, font_size, style.color, offset, &glyphs);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
