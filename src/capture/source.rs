use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use anyhow::Context;
use async_trait::async_trait;

use crate::{
    capture::frame::StillFrame,
    foundation::error::{BoothError, BoothResult},
};

/// A camera the Video Source can stream from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DeviceInfo {
    pub id: String,
    pub label: String,
}

/// Token for one running stream; frames can only be grabbed through the live handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamHandle(u64);

impl StreamHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Live camera collaborator.
///
/// Starting and stopping streams may suspend; grabbing a still from a running stream does not.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn list_devices(&self) -> BoothResult<Vec<DeviceInfo>>;

    /// Start streaming from `device_id`, or from the first device when `None`.
    async fn start_stream(&self, device_id: Option<&str>) -> BoothResult<StreamHandle>;

    /// Stop a stream. Stopping a stream that is not running is a no-op.
    async fn stop_stream(&self, handle: StreamHandle) -> BoothResult<()>;

    /// Grab one still frame. Fails with [`BoothError::NoActiveStream`] when `handle` is not
    /// the running stream.
    fn capture_frame(&self, handle: StreamHandle) -> BoothResult<StillFrame>;
}

#[derive(Debug, Default)]
struct StreamState {
    next_handle: u64,
    active: Option<StreamHandle>,
}

impl StreamState {
    fn start(&mut self) -> StreamHandle {
        self.next_handle += 1;
        let handle = StreamHandle(self.next_handle);
        self.active = Some(handle);
        handle
    }

    fn stop(&mut self, handle: StreamHandle) {
        if self.active == Some(handle) {
            self.active = None;
        }
    }

    fn check(&self, handle: StreamHandle) -> BoothResult<()> {
        if self.active == Some(handle) {
            Ok(())
        } else {
            Err(BoothError::no_active_stream(format!(
                "stream {} is not running",
                handle.0
            )))
        }
    }
}

fn resolve_device<'a>(devices: &'a [DeviceInfo], id: Option<&str>) -> BoothResult<&'a DeviceInfo> {
    match id {
        Some(id) => devices
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| BoothError::no_active_stream(format!("camera '{id}' not found"))),
        None => devices
            .first()
            .ok_or_else(|| BoothError::no_active_stream("no camera available")),
    }
}

#[derive(Debug, Default)]
struct PatternState {
    stream: StreamState,
    frames_served: u64,
    failures_pending: usize,
    stop_failures_pending: usize,
    refuse_streams: bool,
}

/// Synthetic camera producing deterministic gradient frames.
///
/// Frame `n` carries `n * 40 mod 256` in its blue channel, so capture order is visible in the
/// pixels. Failures can be injected for tests.
#[derive(Debug)]
pub struct PatternSource {
    width: u32,
    height: u32,
    devices: Vec<DeviceInfo>,
    state: Mutex<PatternState>,
}

impl PatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            devices: vec![DeviceInfo {
                id: "pattern-0".to_owned(),
                label: "Test pattern".to_owned(),
            }],
            state: Mutex::new(PatternState::default()),
        }
    }

    /// Make the next `n` captures fail with [`BoothError::Capture`].
    pub fn fail_next_captures(&self, n: usize) {
        self.lock().failures_pending = n;
    }

    /// Make the next `n` stream stops fail while the stream keeps running, like a busy device.
    pub fn fail_next_stops(&self, n: usize) {
        self.lock().stop_failures_pending = n;
    }

    /// Refuse to start streams, like a camera with no permission.
    pub fn refuse_streams(&self, refuse: bool) {
        self.lock().refuse_streams = refuse;
    }

    pub fn frames_served(&self) -> u64 {
        self.lock().frames_served
    }

    pub fn is_streaming(&self) -> bool {
        self.lock().stream.active.is_some()
    }

    /// Blue channel value of the `n`-th served frame.
    pub fn frame_marker(n: u64) -> u8 {
        (n.wrapping_mul(40) % 256) as u8
    }

    fn lock(&self) -> MutexGuard<'_, PatternState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render(&self, n: u64) -> BoothResult<StillFrame> {
        let (w, h) = (self.width, self.height);
        let marker = Self::frame_marker(n);
        let mut rgba = Vec::with_capacity((w as usize) * (h as usize) * 4);
        for y in 0..h {
            for x in 0..w {
                rgba.extend_from_slice(&[
                    (x * 255 / w) as u8,
                    (y * 255 / h) as u8,
                    marker,
                    255,
                ]);
            }
        }
        StillFrame::from_rgba8(w, h, rgba)
    }
}

#[async_trait]
impl VideoSource for PatternSource {
    async fn list_devices(&self) -> BoothResult<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    async fn start_stream(&self, device_id: Option<&str>) -> BoothResult<StreamHandle> {
        let device = resolve_device(&self.devices, device_id)?;
        let mut state = self.lock();
        if state.refuse_streams {
            return Err(BoothError::no_active_stream(format!(
                "camera '{}' refused to start",
                device.id
            )));
        }
        let handle = state.stream.start();
        tracing::debug!(device = %device.id, stream = handle.0, "pattern stream started");
        Ok(handle)
    }

    async fn stop_stream(&self, handle: StreamHandle) -> BoothResult<()> {
        let mut state = self.lock();
        if state.stop_failures_pending > 0 && state.stream.active == Some(handle) {
            state.stop_failures_pending -= 1;
            return Err(BoothError::capture("camera busy, stream not stopped"));
        }
        state.stream.stop(handle);
        Ok(())
    }

    fn capture_frame(&self, handle: StreamHandle) -> BoothResult<StillFrame> {
        let n = {
            let mut state = self.lock();
            state.stream.check(handle)?;
            if state.failures_pending > 0 {
                state.failures_pending -= 1;
                return Err(BoothError::capture("simulated sensor failure"));
            }
            let n = state.frames_served;
            state.frames_served += 1;
            n
        };
        self.render(n)
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    stream: StreamState,
    next: usize,
}

/// Replays image files from a directory as camera frames, in file-name order, wrapping around.
#[derive(Debug)]
pub struct DirectorySource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    state: Mutex<DirectoryState>,
}

impl DirectorySource {
    pub fn open(dir: &Path) -> BoothResult<Self> {
        let entries =
            std::fs::read_dir(dir).with_context(|| format!("read frames dir '{}'", dir.display()))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("list frames dir '{}'", dir.display()))?
                .path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| {
                    matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg")
                });
            if is_image && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        if files.is_empty() {
            return Err(BoothError::validation(format!(
                "no png/jpeg files in '{}'",
                dir.display()
            )));
        }
        tracing::info!(dir = %dir.display(), files = files.len(), "directory source ready");
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            state: Mutex::new(DirectoryState::default()),
        })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn device(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.dir.display().to_string(),
            label: format!("Frames from {}", self.dir.display()),
        }
    }
}

#[async_trait]
impl VideoSource for DirectorySource {
    async fn list_devices(&self) -> BoothResult<Vec<DeviceInfo>> {
        Ok(vec![self.device()])
    }

    async fn start_stream(&self, device_id: Option<&str>) -> BoothResult<StreamHandle> {
        let devices = [self.device()];
        resolve_device(&devices, device_id)?;
        Ok(self.lock().stream.start())
    }

    async fn stop_stream(&self, handle: StreamHandle) -> BoothResult<()> {
        self.lock().stream.stop(handle);
        Ok(())
    }

    fn capture_frame(&self, handle: StreamHandle) -> BoothResult<StillFrame> {
        let path = {
            let mut state = self.lock();
            state.stream.check(handle)?;
            let path = &self.files[state.next % self.files.len()];
            state.next += 1;
            path.clone()
        };
        StillFrame::open(&path)
            .map_err(|e| BoothError::capture(format!("frame '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/source.rs"]
mod tests;
