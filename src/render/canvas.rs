use std::sync::Arc;

use kurbo::{Shape, Stroke, StrokeOpts};

use crate::{
    filter::engine::FilteredImage,
    foundation::{
        core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2},
        error::{BoothError, BoothResult},
        math::premultiply_rgba8_in_place,
    },
    render::blur::{blur_rgba8_premul, radius_for_sigma},
};

const PATH_TOLERANCE: f64 = 0.1;

/// Blurred silhouette painted under a shape, like a 2D canvas `shadowBlur`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    /// Canvas-style blur length; the Gaussian sigma is half of it.
    pub blur: f64,
    pub offset: Vec2,
}

impl Shadow {
    pub fn glow(color: Rgba8, blur: f64) -> Self {
        Self {
            color,
            blur,
            offset: Vec2::ZERO,
        }
    }
}

/// Raster surface for one composite: a `vello_cpu` context plus a save/restore transform stack.
pub struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    transform: Affine,
    saved: Vec<Affine>,
    opacity_layers: usize,
}

impl Surface {
    pub fn new(canvas: Canvas) -> BoothResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| BoothError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| BoothError::validation("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(BoothError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            transform: Affine::IDENTITY,
            saved: Vec::new(),
            opacity_layers: 0,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Pop the last saved transform. An unbalanced restore resets to identity.
    pub fn restore(&mut self) {
        self.transform = self.saved.pop().unwrap_or(Affine::IDENTITY);
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform *= Affine::translate((dx, dy));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.transform *= Affine::rotate(radians);
    }

    /// Start a group whose content is blended at `alpha` when popped.
    pub fn push_opacity(&mut self, alpha: f32) {
        self.ctx.push_opacity_layer(alpha.clamp(0.0, 1.0));
        self.opacity_layers += 1;
    }

    pub fn pop_opacity(&mut self) {
        if self.opacity_layers > 0 {
            self.ctx.pop_layer();
            self.opacity_layers -= 1;
        }
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.begin(self.transform);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fill_path(&rect.to_path(PATH_TOLERANCE), color);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.fill_path(&rect.to_rounded_rect(radius).to_path(PATH_TOLERANCE), color);
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            return;
        }
        self.fill_path(&kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE), color);
    }

    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba8) {
        self.fill_path(&polygon_path(points), color);
    }

    /// Stroke centered on the path outline, mitered corners.
    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        if width <= 0.0 {
            return;
        }
        let outline = stroke_outline(path, width);
        self.fill_path(&outline, color);
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba8, width: f64) {
        self.stroke_path(&rect.to_path(PATH_TOLERANCE), color, width);
    }

    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8, width: f64) {
        self.stroke_path(
            &rect.to_rounded_rect(radius).to_path(PATH_TOLERANCE),
            color,
            width,
        );
    }

    /// Fill `rect` with a linear gradient running from `start` to `end` (local coordinates),
    /// stops spread evenly.
    pub fn fill_linear_gradient(
        &mut self,
        rect: Rect,
        start: Point,
        end: Point,
        stops: &[Rgba8],
    ) -> BoothResult<()> {
        let w = rect.width().ceil().max(1.0) as u32;
        let h = rect.height().ceil().max(1.0) as u32;
        let local_start = start - rect.origin().to_vec2();
        let local_end = end - rect.origin().to_vec2();
        let bytes = linear_gradient_premul(w, h, local_start, local_end, stops);
        let paint = rgba_premul_to_image(&bytes, w, h)?;

        self.begin(self.transform * Affine::translate(rect.origin().to_vec2()));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, rect.width(), rect.height()));
        Ok(())
    }

    /// Paint the blurred silhouette of `path` under the current transform.
    pub fn draw_shadow(&mut self, path: &BezPath, shadow: Shadow) -> BoothResult<()> {
        if shadow.color.a == 0 {
            return Ok(());
        }
        let sigma = (shadow.blur / 2.0) as f32;
        let radius = radius_for_sigma(sigma);
        let device = self.transform * path.clone();
        let pad = f64::from(radius) + 1.0;
        let bbox = device.bounding_box().inflate(pad, pad);
        let bbox = Rect::new(
            bbox.x0.floor(),
            bbox.y0.floor(),
            bbox.x1.ceil(),
            bbox.y1.ceil(),
        );
        let (bw, bh) = (bbox.width() as u32, bbox.height() as u32);
        let (Ok(bw16), Ok(bh16)) = (u16::try_from(bw), u16::try_from(bh)) else {
            return Err(BoothError::validation("shadow extent exceeds u16"));
        };
        if bw16 == 0 || bh16 == 0 {
            return Ok(());
        }

        let mut ctx = vello_cpu::RenderContext::new(bw16, bh16);
        ctx.set_transform(affine_to_cpu(Affine::translate(-bbox.origin().to_vec2())));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            shadow.color.r,
            shadow.color.g,
            shadow.color.b,
            shadow.color.a,
        ));
        ctx.fill_path(&bezpath_to_cpu(&device));
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(bw16, bh16);
        ctx.render_to_pixmap(&mut pixmap);

        let blurred = if radius > 0 {
            blur_rgba8_premul(pixmap.data_as_u8_slice(), bw, bh, radius, sigma)?
        } else {
            pixmap.data_as_u8_slice().to_vec()
        };
        let paint = rgba_premul_to_image(&blurred, bw, bh)?;

        self.begin(Affine::translate(bbox.origin().to_vec2() + shadow.offset));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(bw),
            f64::from(bh),
        ));
        Ok(())
    }

    /// Draw a filtered image into `rect`, rotated about the rect center by the image rotation.
    pub fn draw_image(&mut self, image: &FilteredImage, rect: Rect) -> BoothResult<()> {
        let mut premul = image.rgba8.clone();
        premultiply_rgba8_in_place(&mut premul);
        let paint = rgba_premul_to_image(&premul, image.width, image.height)?;

        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let place = Affine::translate(rect.center().to_vec2())
            * Affine::rotate(image.rotation)
            * Affine::translate((-rect.width() / 2.0, -rect.height() / 2.0))
            * Affine::scale_non_uniform(rect.width() / iw, rect.height() / ih);
        self.begin(self.transform * place);
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        Ok(())
    }

    /// Fill glyphs already positioned in local coordinates.
    pub(crate) fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        font_size: f32,
        color: Rgba8,
        offset: Vec2,
        glyphs: &[vello_cpu::Glyph],
    ) {
        if glyphs.is_empty() || color.a == 0 {
            return;
        }
        self.begin(self.transform * Affine::translate(offset));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .glyph_run(font)
            .font_size(font_size)
            .fill_glyphs(glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            }));
    }

    /// Rasterize everything drawn so far into premultiplied RGBA8.
    pub fn finish(mut self) -> Vec<u8> {
        while self.opacity_layers > 0 {
            self.pop_opacity();
        }
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }

    fn begin(&mut self, transform: Affine) {
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
    }
}

pub fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Fill outline of a stroke along `path`.
pub fn stroke_outline(path: &BezPath, width: f64) -> BezPath {
    let style = Stroke::new(width).with_join(kurbo::Join::Miter);
    kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), PATH_TOLERANCE)
}

/// Rasterize a multi-stop linear gradient into premultiplied RGBA8.
pub fn linear_gradient_premul(
    width: u32,
    height: u32,
    start: Point,
    end: Point,
    stops: &[Rgba8],
) -> Vec<u8> {
    let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
    let Some(first) = stops.first().copied() else {
        return bytes;
    };
    let axis = end - start;
    let len2 = axis.hypot2();
    let segments = stops.len().saturating_sub(1);
    for y in 0..height {
        for x in 0..width {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = if len2 > 0.0 {
                ((p - start).dot(axis) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let color = if segments == 0 {
                first
            } else {
                let pos = t * segments as f64;
                let i = (pos.floor() as usize).min(segments - 1);
                lerp_rgba(stops[i], stops[i + 1], (pos - i as f64) as f32)
            };
            let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&color.to_premul().to_array());
        }
    }
    bytes
}

fn lerp_rgba(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    let lerp = |a: u8, b: u8| -> u8 {
        let af = f32::from(a);
        let bf = f32::from(b);
        (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba8::rgba(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> BoothResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BoothError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BoothError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(BoothError::validation("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> BoothResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
