use crate::foundation::error::{BoothError, BoothResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Registry key of a template, matching the ids shown in the selection screen.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TemplateId(pub u16);

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> BoothResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoothError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Same color with alpha taken from a `[0, 1]` factor.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` or `rgba(r,g,b,a)` with `a` in `[0,1]`.
    pub fn parse(s: &str) -> BoothResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|b| b.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 && parts.len() != 4 {
                return Err(BoothError::validation(format!("invalid color '{s}'")));
            }
            let channel = |p: &str| -> BoothResult<u8> {
                p.parse::<u8>()
                    .map_err(|_| BoothError::validation(format!("invalid color channel '{p}'")))
            };
            let alpha = match parts.get(3) {
                Some(p) => p
                    .parse::<f32>()
                    .ok()
                    .filter(|a| a.is_finite())
                    .ok_or_else(|| BoothError::validation(format!("invalid alpha '{p}'")))?,
                None => 1.0,
            };
            return Ok(Self::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?)
                .with_alpha(alpha));
        }
        Err(BoothError::validation(format!("unsupported color '{s}'")))
    }
}

fn parse_hex(hex: &str) -> BoothResult<Rgba8> {
    let nibble = |c: u8| -> BoothResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| BoothError::validation(format!("invalid hex color '#{hex}'")))
    };
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Ok(Rgba8::rgb(r * 17, g * 17, b * 17))
        }
        6 | 8 => {
            let mut out = [255u8; 4];
            for (i, pair) in bytes.chunks_exact(2).enumerate() {
                out[i] = (nibble(pair[0])? << 4) | nibble(pair[1])?;
            }
            Ok(Rgba8::rgba(out[0], out[1], out[2], out[3]))
        }
        _ => Err(BoothError::validation(format!(
            "hex color must have 3, 6 or 8 digits: '#{hex}'"
        ))),
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
