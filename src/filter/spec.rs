use crate::foundation::error::{BoothError, BoothResult};

/// Per-image filter parameters.
///
/// Brightness, contrast and saturation are percentages where `100` is the identity. Levels are
/// expressed as `whites`/`blacks` on `0..=100`; `sharpness` is the unsharp-mask strength.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub sepia: f32,
    pub hue: f32,
    #[serde(alias = "white")]
    pub whites: f32,
    #[serde(alias = "black")]
    pub blacks: f32,
    pub sharpness: f32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FilterSpec {
    pub const IDENTITY: Self = Self {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
        sepia: 0.0,
        hue: 0.0,
        whites: 100.0,
        blacks: 0.0,
        sharpness: 0.0,
    };

    pub fn with_brightness(self, v: f32) -> Self {
        Self {
            brightness: v,
            ..self
        }
        .clamped()
    }

    pub fn with_contrast(self, v: f32) -> Self {
        Self {
            contrast: v,
            ..self
        }
        .clamped()
    }

    pub fn with_saturation(self, v: f32) -> Self {
        Self {
            saturation: v,
            ..self
        }
        .clamped()
    }

    pub fn with_sepia(self, v: f32) -> Self {
        Self { sepia: v, ..self }.clamped()
    }

    pub fn with_hue(self, v: f32) -> Self {
        Self { hue: v, ..self }.clamped()
    }

    pub fn with_levels(self, whites: f32, blacks: f32) -> Self {
        Self {
            whites,
            blacks,
            ..self
        }
        .clamped()
    }

    pub fn with_sharpness(self, v: f32) -> Self {
        Self {
            sharpness: v,
            ..self
        }
        .clamped()
    }

    /// Clamp every parameter into its documented range. Non-finite values fall back to identity.
    pub fn clamped(self) -> Self {
        fn c(v: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
            if v.is_finite() { v.clamp(lo, hi) } else { fallback }
        }
        let id = Self::IDENTITY;
        Self {
            brightness: c(self.brightness, 0.0, 200.0, id.brightness),
            contrast: c(self.contrast, 0.0, 200.0, id.contrast),
            saturation: c(self.saturation, 0.0, 200.0, id.saturation),
            sepia: c(self.sepia, 0.0, 100.0, id.sepia),
            hue: c(self.hue, -180.0, 180.0, id.hue),
            whites: c(self.whites, 0.0, 100.0, id.whites),
            blacks: c(self.blacks, 0.0, 100.0, id.blacks),
            sharpness: c(self.sharpness, 0.0, 100.0, id.sharpness),
        }
    }

    /// Strict check used for caller-supplied specs (CLI, config).
    pub fn validate(&self) -> BoothResult<()> {
        let checks: [(&str, f32, f32, f32); 8] = [
            ("brightness", self.brightness, 0.0, 200.0),
            ("contrast", self.contrast, 0.0, 200.0),
            ("saturation", self.saturation, 0.0, 200.0),
            ("sepia", self.sepia, 0.0, 100.0),
            ("hue", self.hue, -180.0, 180.0),
            ("whites", self.whites, 0.0, 100.0),
            ("blacks", self.blacks, 0.0, 100.0),
            ("sharpness", self.sharpness, 0.0, 100.0),
        ];
        for (name, v, lo, hi) in checks {
            if !v.is_finite() || v < lo || v > hi {
                return Err(BoothError::validation(format!(
                    "filter {name} must be within [{lo}, {hi}], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Layer `over` on top of `self`: every non-identity field of `over` replaces the
    /// corresponding field of `self`.
    pub fn overlay(self, over: &FilterSpec) -> Self {
        let id = Self::IDENTITY;
        let pick = |base: f32, o: f32, ident: f32| if o != ident { o } else { base };
        Self {
            brightness: pick(self.brightness, over.brightness, id.brightness),
            contrast: pick(self.contrast, over.contrast, id.contrast),
            saturation: pick(self.saturation, over.saturation, id.saturation),
            sepia: pick(self.sepia, over.sepia, id.sepia),
            hue: pick(self.hue, over.hue, id.hue),
            whites: pick(self.whites, over.whites, id.whites),
            blacks: pick(self.blacks, over.blacks, id.blacks),
            sharpness: pick(self.sharpness, over.sharpness, id.sharpness),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn has_levels(&self) -> bool {
        self.whites != Self::IDENTITY.whites || self.blacks != Self::IDENTITY.blacks
    }

    /// Color operations in the fixed order brightness, contrast, saturate, sepia, hue-rotate.
    /// Identity steps are omitted.
    pub fn color_ops(&self) -> Vec<ColorOp> {
        [
            ColorOp::Brightness(self.brightness / 100.0),
            ColorOp::Contrast(self.contrast / 100.0),
            ColorOp::Saturate(self.saturation / 100.0),
            ColorOp::Sepia(self.sepia / 100.0),
            ColorOp::HueRotate(self.hue),
        ]
        .into_iter()
        .filter(|op| !op.is_identity())
        .collect()
    }
}

/// One step of a color filter chain. Amounts are fractions (`1.0` = 100%), hue in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", content = "amount", rename_all = "kebab-case")]
pub enum ColorOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Sepia(f32),
    Grayscale(f32),
    HueRotate(f32),
}

impl ColorOp {
    pub fn is_identity(&self) -> bool {
        match *self {
            Self::Brightness(v) | Self::Contrast(v) | Self::Saturate(v) => v == 1.0,
            Self::Sepia(v) | Self::Grayscale(v) | Self::HueRotate(v) => v == 0.0,
        }
    }
}

/// Named looks offered by the re-edit screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    #[default]
    Original,
    Vivid,
    VividWarm,
    VividCool,
    Dramatic,
    Mono,
    Silvertone,
    Noir,
    Fade,
    Warm,
}

impl Preset {
    pub const ALL: [Preset; 10] = [
        Self::Original,
        Self::Vivid,
        Self::VividWarm,
        Self::VividCool,
        Self::Dramatic,
        Self::Mono,
        Self::Silvertone,
        Self::Noir,
        Self::Fade,
        Self::Warm,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Vivid => "vivid",
            Self::VividWarm => "vivid-warm",
            Self::VividCool => "vivid-cool",
            Self::Dramatic => "dramatic",
            Self::Mono => "mono",
            Self::Silvertone => "silvertone",
            Self::Noir => "noir",
            Self::Fade => "fade",
            Self::Warm => "warm",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Vivid => "Vivid",
            Self::VividWarm => "Vivid Warm",
            Self::VividCool => "Vivid Cool",
            Self::Dramatic => "Dramatic",
            Self::Mono => "Mono",
            Self::Silvertone => "Silver",
            Self::Noir => "Noir",
            Self::Fade => "Fade",
            Self::Warm => "Warm",
        }
    }

    pub fn parse(s: &str) -> BoothResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| BoothError::validation(format!("unknown preset '{s}'")))
    }

    /// The preset's chain, applied in the listed order.
    pub fn ops(self) -> Vec<ColorOp> {
        use ColorOp::*;
        match self {
            Self::Original => vec![],
            Self::Vivid => vec![Saturate(1.5), Contrast(1.1), Brightness(1.05)],
            Self::VividWarm => vec![Saturate(1.4), Sepia(0.2), Contrast(1.1)],
            Self::VividCool => vec![Saturate(1.4), HueRotate(10.0), Contrast(1.1)],
            Self::Dramatic => vec![Contrast(1.4), Brightness(0.9), Saturate(0.8)],
            Self::Mono => vec![Grayscale(1.0), Contrast(1.2), Brightness(1.1)],
            Self::Silvertone => vec![Grayscale(1.0), Contrast(1.5), Brightness(0.9)],
            Self::Noir => vec![Grayscale(1.0), Contrast(2.0), Brightness(0.7)],
            Self::Fade => vec![Brightness(1.1), Contrast(0.9), Saturate(0.7), Sepia(0.1)],
            Self::Warm => vec![Sepia(0.3), Saturate(1.2), Contrast(1.1)],
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Slider values of the re-edit screen, each on `-100..=100` except `vignette` (`0..=100`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub exposure: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub vibrance: f32,
    pub tint: f32,
    /// Negative values soften the picture; positive values are ignored.
    pub sharpness: f32,
    pub vignette: f32,
}

impl Adjustments {
    pub fn clamped(self) -> Self {
        let c = |v: f32, lo: f32| if v.is_finite() { v.clamp(lo, 100.0) } else { 0.0 };
        Self {
            exposure: c(self.exposure, -100.0),
            brightness: c(self.brightness, -100.0),
            contrast: c(self.contrast, -100.0),
            saturation: c(self.saturation, -100.0),
            vibrance: c(self.vibrance, -100.0),
            tint: c(self.tint, -100.0),
            sharpness: c(self.sharpness, -100.0),
            vignette: c(self.vignette, 0.0),
        }
    }

    /// Set one slider by name, e.g. from `--adjust exposure=20`.
    pub fn set(&mut self, key: &str, value: f32) -> BoothResult<()> {
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "exposure" => &mut self.exposure,
            "brightness" => &mut self.brightness,
            "contrast" => &mut self.contrast,
            "saturation" => &mut self.saturation,
            "vibrance" => &mut self.vibrance,
            "tint" => &mut self.tint,
            "sharpness" => &mut self.sharpness,
            "vignette" => &mut self.vignette,
            other => {
                return Err(BoothError::validation(format!(
                    "unknown adjustment '{other}'"
                )));
            }
        };
        *slot = value;
        *self = self.clamped();
        Ok(())
    }

    /// Color chain derived from the sliders: brightness, contrast, saturate, hue-rotate.
    pub fn ops(&self) -> Vec<ColorOp> {
        let a = self.clamped();
        let b = 100.0 + a.brightness + a.exposure * 0.5;
        let c = 100.0 + a.contrast;
        let s = 100.0 + a.saturation + a.vibrance * 0.5;
        [
            ColorOp::Brightness(b.max(0.0) / 100.0),
            ColorOp::Contrast(c.max(0.0) / 100.0),
            ColorOp::Saturate(s.max(0.0) / 100.0),
            ColorOp::HueRotate(a.tint * 0.5),
        ]
        .into_iter()
        .filter(|op| !op.is_identity())
        .collect()
    }

    /// Softening blur in pixels requested by a negative sharpness slider.
    pub fn blur_px(&self) -> f32 {
        let s = self.clamped().sharpness;
        if s < 0.0 { s.abs() / 20.0 } else { 0.0 }
    }
}

/// Complete re-edit request: a preset followed by slider adjustments.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub preset: Preset,
    pub adjustments: Adjustments,
}

impl EditorSettings {
    pub fn color_ops(&self) -> Vec<ColorOp> {
        let mut ops = self.preset.ops();
        ops.extend(self.adjustments.ops());
        ops
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/spec.rs"]
mod tests;
