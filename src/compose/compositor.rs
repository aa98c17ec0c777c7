use kurbo::Shape;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    capture::frame::{ImageInput, StillFrame},
    filter::{
        engine::{SlotMask, apply_filters},
        spec::FilterSpec,
    },
    foundation::{
        core::{Point, Rect, Rgba8},
        error::BoothResult,
    },
    render::{
        canvas::{Shadow, Surface},
        encode::{CompositeResult, EncodeSettings, encode_premul},
        text::{FontBook, TextPainter, TextStyle},
    },
    templates::Template,
};

/// Caller-controlled inputs to a composite that are not images.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposeOptions {
    /// Replaces the default background of templates that allow it.
    pub background: Option<Rgba8>,
    /// Layered over every slot's own filter.
    pub filter: Option<FilterSpec>,
    /// Seed for pseudo-random decoration.
    pub seed: u64,
    /// Date printed by templates that stamp one.
    pub date: chrono::NaiveDate,
    pub encode: EncodeSettings,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            background: None,
            filter: None,
            seed: 0,
            date: chrono::Local::now().date_naive(),
            encode: EncodeSettings::default(),
        }
    }
}

/// One image placement requested by a template draw routine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// Index into the captured images (capture order).
    pub index: usize,
    /// Target rectangle in the current local coordinates.
    pub rect: Rect,
    pub rotation: f64,
    pub mask: SlotMask,
    pub filter: FilterSpec,
    pub shadow: Option<Shadow>,
}

impl Slot {
    pub fn new(index: usize, rect: Rect) -> Self {
        Self {
            index,
            rect,
            rotation: 0.0,
            mask: SlotMask::None,
            filter: FilterSpec::IDENTITY,
            shadow: None,
        }
    }

    pub fn with_mask(self, mask: SlotMask) -> Self {
        Self { mask, ..self }
    }

    pub fn with_filter(self, filter: FilterSpec) -> Self {
        Self { filter, ..self }
    }

    pub fn with_shadow(self, shadow: Shadow) -> Self {
        Self {
            shadow: Some(shadow),
            ..self
        }
    }
}

/// Drawing state handed to a template's draw routine.
pub struct DrawContext<'a> {
    surface: Surface,
    images: &'a [Option<StillFrame>],
    options: &'a ComposeOptions,
    text: TextPainter,
    rng: StdRng,
    drawn: Vec<usize>,
}

impl<'a> DrawContext<'a> {
    pub fn surface(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn width(&self) -> f64 {
        f64::from(self.surface.width())
    }

    pub fn height(&self) -> f64 {
        f64::from(self.surface.height())
    }

    pub fn bounds(&self) -> Rect {
        self.surface.bounds()
    }

    /// Background color: the caller override when present, else the template default.
    pub fn background_or(&self, default: Rgba8) -> Rgba8 {
        self.options.background.unwrap_or(default)
    }

    /// Whether an image exists for `index` (present and decodable).
    pub fn has_image(&self, index: usize) -> bool {
        matches!(self.images.get(index), Some(Some(_)))
    }

    /// `M/D/YYYY` stamp of the composite date.
    pub fn date_label(&self) -> String {
        self.options.date.format("%-m/%-d/%Y").to_string()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Filter, mask and draw one image. Missing or undecodable images leave the slot empty.
    pub fn draw_slot(&mut self, slot: Slot) -> BoothResult<bool> {
        let Some(Some(frame)) = self.images.get(slot.index) else {
            tracing::debug!(index = slot.index, "no image for slot, leaving background");
            return Ok(false);
        };
        let w = slot.rect.width().round().max(1.0) as u32;
        let h = slot.rect.height().round().max(1.0) as u32;
        let spec = match &self.options.filter {
            Some(over) => slot.filter.overlay(over),
            None => slot.filter,
        };
        let mut filtered = apply_filters(frame, w, h, slot.rotation, &spec)?;
        filtered.apply_mask(slot.mask);

        if let Some(shadow) = slot.shadow {
            let silhouette = match slot.mask {
                SlotMask::None => slot.rect.to_path(0.1),
                SlotMask::Circle => kurbo::Circle::new(
                    slot.rect.center(),
                    slot.rect.width().min(slot.rect.height()) / 2.0,
                )
                .to_path(0.1),
                SlotMask::RoundedRect { radius } => {
                    slot.rect.to_rounded_rect(radius).to_path(0.1)
                }
            };
            let silhouette = kurbo::Affine::rotate_about(slot.rotation, slot.rect.center())
                * silhouette;
            self.surface.draw_shadow(&silhouette, shadow)?;
        }
        self.surface.draw_image(&filtered, slot.rect)?;
        self.drawn.push(slot.index);
        Ok(true)
    }

    pub fn text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) -> BoothResult<()> {
        self.text
            .draw(&mut self.surface, text, Point::new(x, y), &style)
    }
}

/// Draws templates over captured images and encodes the result.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    fonts: FontBook,
}

impl Compositor {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    /// Composite `images` (capture order) into `template`.
    ///
    /// Undecodable images and slots beyond the supplied images stay as background.
    #[tracing::instrument(level = "info", skip(self, template, images, options), fields(template = %template.id, images = images.len()))]
    pub fn composite(
        &self,
        template: &Template,
        images: &[ImageInput],
        options: &ComposeOptions,
    ) -> BoothResult<CompositeResult> {
        let decoded: Vec<Option<StillFrame>> = images
            .iter()
            .enumerate()
            .map(|(i, input)| match input.load() {
                Ok(frame) => Some(frame),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping undecodable image");
                    None
                }
            })
            .collect();

        let canvas = template.canvas();
        let mut dc = DrawContext {
            surface: Surface::new(canvas)?,
            images: &decoded,
            options,
            text: TextPainter::new(self.fonts.clone()),
            rng: StdRng::seed_from_u64(options.seed),
            drawn: Vec::new(),
        };
        template.draw(&mut dc)?;
        let drawn = dc.drawn.len();
        let pixels = dc.surface.finish();

        let result = encode_premul(&pixels, canvas.width, canvas.height, options.encode)?;
        tracing::info!(
            slots_drawn = drawn,
            bytes = result.bytes.len(),
            "composite finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
