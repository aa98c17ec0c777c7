use crate::{
    capture::frame::StillFrame,
    foundation::error::{BoothError, BoothResult},
};

/// When the flash effect fires before a capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Fires with the configured probability.
    Auto,
    #[default]
    On,
    Off,
}

impl FlashMode {
    pub fn parse(s: &str) -> BoothResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(BoothError::validation(format!(
                "unknown flash mode '{other}' (expected auto|on|off)"
            ))),
        }
    }
}

/// Frames collected for one template, in capture order.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    required_count: usize,
    frames: Vec<StillFrame>,
    timer_seconds: u32,
    timer_seconds_remaining: u32,
    flash_mode: FlashMode,
}

impl CaptureSession {
    pub fn new(required_count: usize, timer_seconds: u32, flash_mode: FlashMode) -> BoothResult<Self> {
        if required_count == 0 {
            return Err(BoothError::validation("a session needs at least one photo"));
        }
        Ok(Self {
            required_count,
            frames: Vec::with_capacity(required_count),
            timer_seconds,
            timer_seconds_remaining: 0,
            flash_mode,
        })
    }

    /// Same settings, no frames.
    pub fn fresh(&self) -> Self {
        Self {
            required_count: self.required_count,
            frames: Vec::with_capacity(self.required_count),
            timer_seconds: self.timer_seconds,
            timer_seconds_remaining: 0,
            flash_mode: self.flash_mode,
        }
    }

    pub fn required_count(&self) -> usize {
        self.required_count
    }

    pub fn frames(&self) -> &[StillFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.required_count - self.frames.len()
    }

    pub fn is_complete(&self) -> bool {
        self.frames.len() == self.required_count
    }

    pub fn timer_armed(&self) -> bool {
        self.timer_seconds > 0
    }

    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    pub fn timer_seconds_remaining(&self) -> u32 {
        self.timer_seconds_remaining
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    /// `0` disables the countdown.
    pub fn set_timer(&mut self, seconds: u32) {
        self.timer_seconds = seconds;
    }

    pub fn set_flash_mode(&mut self, mode: FlashMode) {
        self.flash_mode = mode;
    }

    pub(crate) fn set_timer_remaining(&mut self, seconds: u32) {
        self.timer_seconds_remaining = seconds;
    }

    /// Append the next frame; refuses once the session is full.
    pub(crate) fn push(&mut self, frame: StillFrame) -> BoothResult<usize> {
        if self.is_complete() {
            return Err(BoothError::validation(format!(
                "session already holds {} frames",
                self.required_count
            )));
        }
        self.frames.push(frame);
        Ok(self.frames.len() - 1)
    }

    /// Drop one frame; later frames keep their relative order.
    pub(crate) fn remove(&mut self, index: usize) -> BoothResult<StillFrame> {
        if index >= self.frames.len() {
            return Err(BoothError::validation(format!(
                "no frame at index {index} (have {})",
                self.frames.len()
            )));
        }
        Ok(self.frames.remove(index))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
