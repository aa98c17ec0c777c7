use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    capture::{sequencer::SequencerSettings, session::FlashMode},
    foundation::{
        core::Rgba8,
        error::{BoothError, BoothResult},
    },
    render::{
        encode::{EncodeSettings, OutputFormat},
        text::{FontBook, FontRole},
    },
    session::controller::SessionSettings,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Countdown before each shot; `0` captures immediately.
    pub timer_seconds: u32,
    pub shutter_delay_ms: u64,
    pub flash_mode: FlashMode,
    pub auto_flash_probability: f64,
    pub device_id: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            timer_seconds: 0,
            shutter_delay_ms: 150,
            flash_mode: FlashMode::On,
            auto_flash_probability: 0.5,
            device_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub jpeg_quality: u8,
    pub out_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            jpeg_quality: 95,
            out_dir: PathBuf::from("out"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub sans: Option<PathBuf>,
    pub serif: Option<PathBuf>,
    pub mono: Option<PathBuf>,
    pub display: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub decoration_seed: Option<u64>,
    /// Session background for templates that allow one (`#rrggbb`); empty keeps each
    /// template's own color.
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            decoration_seed: None,
            background: "#000000".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Booth configuration file (TOML). Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    pub capture: CaptureConfig,
    pub output: OutputConfig,
    pub fonts: FontsConfig,
    pub render: RenderConfig,
    pub log: LogConfig,
}

impl BoothConfig {
    /// Read `path` when given, defaults otherwise. The result is validated.
    pub fn load(path: Option<&Path>) -> BoothResult<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> BoothResult<Self> {
        let path_ref = path.as_ref();
        let contents = std::fs::read_to_string(path_ref).map_err(|err| {
            BoothError::config(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        Self::from_toml(&contents).map_err(|err| {
            BoothError::config(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn from_toml(contents: &str) -> BoothResult<Self> {
        toml::from_str(contents).map_err(|err| BoothError::config(err.to_string()))
    }

    pub fn validate(&self) -> BoothResult<()> {
        if !(50..=150).contains(&self.capture.shutter_delay_ms) {
            return Err(BoothError::config(
                "capture.shutter_delay_ms must be within 50..=150",
            ));
        }
        let p = self.capture.auto_flash_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(BoothError::config(
                "capture.auto_flash_probability must be within 0..=1",
            ));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(BoothError::config("output.jpeg_quality must be within 1..=100"));
        }
        if self.log.level.trim().is_empty() {
            return Err(BoothError::config("log.level must not be empty"));
        }
        self.background()?;
        Ok(())
    }

    /// The parsed `render.background`, `None` when left empty.
    pub fn background(&self) -> BoothResult<Option<Rgba8>> {
        let hex = self.render.background.trim();
        if hex.is_empty() {
            return Ok(None);
        }
        Rgba8::parse(hex)
            .map(Some)
            .map_err(|err| BoothError::config(format!("render.background: {err}")))
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            format: self.output.format,
            quality: self.output.jpeg_quality,
        }
    }

    pub fn session_settings(&self) -> BoothResult<SessionSettings> {
        Ok(SessionSettings {
            timer_seconds: self.capture.timer_seconds,
            flash_mode: self.capture.flash_mode,
            device_id: self.capture.device_id.clone(),
            encode: self.encode_settings(),
            decoration_seed: self.render.decoration_seed,
            background: self.background()?,
            sequencer: SequencerSettings {
                shutter_delay: Duration::from_millis(self.capture.shutter_delay_ms),
                auto_flash_probability: self.capture.auto_flash_probability,
                ..SequencerSettings::default()
            },
        })
    }

    /// Load every configured font file. Relative paths resolve against `base`.
    pub fn font_book(&self, base: &Path) -> BoothResult<FontBook> {
        let mut book = FontBook::new();
        let roles = [
            (FontRole::Sans, &self.fonts.sans),
            (FontRole::Serif, &self.fonts.serif),
            (FontRole::Mono, &self.fonts.mono),
            (FontRole::Display, &self.fonts.display),
        ];
        for (role, path) in roles {
            if let Some(path) = path {
                book.load(role, &base.join(path))?;
            }
        }
        Ok(book)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
