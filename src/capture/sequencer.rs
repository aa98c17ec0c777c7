use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::{mpsc, watch};

use crate::{
    capture::{
        frame::StillFrame,
        session::{CaptureSession, FlashMode},
        source::{StreamHandle, VideoSource},
    },
    foundation::error::{BoothError, BoothResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerPhase {
    Idle,
    Armed { remaining: u32 },
    Capturing,
    Committed,
    Closed,
}

/// Notifications for the presentation layer, in the order they happen.
#[derive(Clone, Debug, PartialEq)]
pub enum SequencerEvent {
    Started { required: usize },
    CountdownTick { remaining: u32 },
    Flash,
    FrameCaptured { index: usize, remaining: usize },
    FrameRemoved { index: usize },
    CaptureFailed { message: String },
    /// Sent once per session with every frame in capture order.
    Completed { frames: Vec<StillFrame> },
    Reset,
    Closed,
}

/// What one capture request amounted to.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureOutcome {
    Captured { index: usize, remaining: usize },
    Completed { frames: Vec<StillFrame> },
    /// Another capture was in flight, or the session is already complete or closed.
    Ignored,
    /// The session was reset or closed while this request was pending.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequencerSettings {
    /// Countdown step.
    pub tick: Duration,
    /// Delay between the flash and grabbing the frame.
    pub shutter_delay: Duration,
    pub auto_flash_probability: f64,
    /// Seeds the auto-flash coin; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            shutter_delay: Duration::from_millis(150),
            auto_flash_probability: 0.5,
            seed: None,
        }
    }
}

impl SequencerSettings {
    fn flash_probability(&self) -> f64 {
        if self.auto_flash_probability.is_finite() {
            self.auto_flash_probability.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

struct Inner {
    phase: SequencerPhase,
    session: Option<CaptureSession>,
    stream: Option<StreamHandle>,
    epoch: u64,
    rng: StdRng,
}

/// Drives countdown, flash and frame grabs for one capture session at a time.
///
/// Every reset or close bumps an epoch; a request that wakes up under a different epoch
/// returns [`CaptureOutcome::Cancelled`] without touching the new session.
pub struct CaptureSequencer {
    source: Arc<dyn VideoSource>,
    settings: SequencerSettings,
    inner: Mutex<Inner>,
    epoch_tx: watch::Sender<u64>,
    events: mpsc::UnboundedSender<SequencerEvent>,
}

impl CaptureSequencer {
    pub fn new(
        source: Arc<dyn VideoSource>,
        settings: SequencerSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SequencerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let (epoch_tx, _) = watch::channel(0);
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let seq = Self {
            source,
            settings,
            inner: Mutex::new(Inner {
                phase: SequencerPhase::Closed,
                session: None,
                stream: None,
                epoch: 0,
                rng,
            }),
            epoch_tx,
            events,
        };
        (seq, rx)
    }

    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    pub fn phase(&self) -> SequencerPhase {
        self.lock().phase
    }

    pub fn frame_count(&self) -> usize {
        self.lock().session.as_ref().map_or(0, CaptureSession::len)
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Option<CaptureSession> {
        self.lock().session.clone()
    }

    pub fn stream(&self) -> Option<StreamHandle> {
        self.lock().stream
    }

    /// Take over a running stream and start collecting frames for `session`.
    pub fn begin(&self, session: CaptureSession, stream: StreamHandle) {
        let required = session.required_count();
        let mut inner = self.lock();
        self.bump(&mut inner);
        inner.session = Some(session);
        inner.stream = Some(stream);
        inner.phase = SequencerPhase::Idle;
        tracing::info!(required, stream = stream.id(), "capture session started");
        self.emit(SequencerEvent::Started { required });
    }

    pub fn set_timer(&self, seconds: u32) -> BoothResult<()> {
        self.with_session(|s| s.set_timer(seconds))
    }

    pub fn set_flash_mode(&self, mode: FlashMode) -> BoothResult<()> {
        self.with_session(|s| s.set_flash_mode(mode))
    }

    /// Run one capture: countdown when a timer is set, flash, shutter delay, grab.
    ///
    /// Requests while armed, capturing, complete or closed are ignored. A failed grab leaves the
    /// frame count unchanged and the sequencer ready for another request.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn request_capture(&self) -> BoothResult<CaptureOutcome> {
        let (epoch, timer) = {
            let mut inner = self.lock();
            if inner.phase != SequencerPhase::Idle {
                tracing::debug!(phase = ?inner.phase, "capture request ignored");
                return Ok(CaptureOutcome::Ignored);
            }
            let Some(session) = inner.session.as_ref() else {
                return Err(BoothError::validation("no capture session started"));
            };
            if session.is_complete() {
                return Ok(CaptureOutcome::Ignored);
            }
            let timer = session.timer_seconds();
            inner.phase = if timer > 0 {
                SequencerPhase::Armed { remaining: timer }
            } else {
                SequencerPhase::Capturing
            };
            (inner.epoch, timer)
        };

        let mut remaining = timer;
        while remaining > 0 {
            let current = self.if_current(epoch, |inner| {
                inner.phase = SequencerPhase::Armed { remaining };
                if let Some(s) = inner.session.as_mut() {
                    s.set_timer_remaining(remaining);
                }
            });
            if current.is_none() {
                return Ok(CaptureOutcome::Cancelled);
            }
            tracing::info!(remaining, "countdown");
            self.emit(SequencerEvent::CountdownTick { remaining });
            if !self.pause(epoch, self.settings.tick).await {
                return Ok(CaptureOutcome::Cancelled);
            }
            remaining -= 1;
        }

        let probability = self.settings.flash_probability();
        let Some((flash, stream)) = self.if_current(epoch, |inner| {
            inner.phase = SequencerPhase::Capturing;
            let mode = match inner.session.as_mut() {
                Some(s) => {
                    s.set_timer_remaining(0);
                    s.flash_mode()
                }
                None => FlashMode::Off,
            };
            let flash = match mode {
                FlashMode::On => true,
                FlashMode::Off => false,
                FlashMode::Auto => inner.rng.gen_bool(probability),
            };
            (flash, inner.stream)
        }) else {
            return Ok(CaptureOutcome::Cancelled);
        };

        if flash {
            tracing::debug!("flash");
            self.emit(SequencerEvent::Flash);
        }
        if !self.pause(epoch, self.settings.shutter_delay).await {
            return Ok(CaptureOutcome::Cancelled);
        }

        let captured = match stream {
            Some(handle) => self.source.capture_frame(handle),
            None => Err(BoothError::no_active_stream("sequencer holds no stream")),
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            return Ok(CaptureOutcome::Cancelled);
        }
        let frame = match captured {
            Ok(frame) => frame,
            Err(e) => {
                inner.phase = SequencerPhase::Idle;
                let err = match e {
                    BoothError::Capture(_) | BoothError::NoActiveStream(_) => e,
                    other => BoothError::capture(other.to_string()),
                };
                tracing::warn!(error = %err, "capture failed");
                self.emit(SequencerEvent::CaptureFailed {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };
        let fingerprint = frame.fingerprint();
        let Some(session) = inner.session.as_mut() else {
            inner.phase = SequencerPhase::Idle;
            return Ok(CaptureOutcome::Cancelled);
        };
        let index = match session.push(frame) {
            Ok(index) => index,
            Err(e) => {
                inner.phase = SequencerPhase::Idle;
                return Err(e);
            }
        };
        let remaining = session.remaining();
        tracing::info!(index, remaining, fingerprint, "frame captured");
        self.emit(SequencerEvent::FrameCaptured { index, remaining });

        if remaining > 0 {
            inner.phase = SequencerPhase::Idle;
            return Ok(CaptureOutcome::Captured { index, remaining });
        }
        let frames = session.frames().to_vec();
        inner.phase = SequencerPhase::Committed;
        tracing::info!(frames = frames.len(), "capture session complete");
        self.emit(SequencerEvent::Completed {
            frames: frames.clone(),
        });
        Ok(CaptureOutcome::Completed { frames })
    }

    /// Drop a captured frame before the session completes.
    pub fn remove_frame(&self, index: usize) -> BoothResult<StillFrame> {
        let mut inner = self.lock();
        if inner.phase != SequencerPhase::Idle {
            return Err(BoothError::validation(format!(
                "cannot remove frames while {:?}",
                inner.phase
            )));
        }
        let session = inner
            .session
            .as_mut()
            .ok_or_else(|| BoothError::validation("no capture session started"))?;
        let frame = session.remove(index)?;
        tracing::info!(index, left = session.len(), "frame removed");
        self.emit(SequencerEvent::FrameRemoved { index });
        Ok(frame)
    }

    /// Cancel anything pending and restart the session with the same settings, keeping the
    /// stream.
    pub fn reset(&self) {
        let mut inner = self.lock();
        self.bump(&mut inner);
        inner.session = inner.session.as_ref().map(CaptureSession::fresh);
        inner.phase = SequencerPhase::Idle;
        tracing::info!("capture session reset");
        self.emit(SequencerEvent::Reset);
    }

    /// Cancel anything pending, discard the session and stop the stream.
    ///
    /// When the source fails to stop the stream the handle is kept, so [`Self::stream`] still
    /// reports it and a later close retries the stop.
    pub async fn close(&self) -> BoothResult<()> {
        let stream = {
            let mut inner = self.lock();
            self.bump(&mut inner);
            inner.phase = SequencerPhase::Closed;
            inner.session = None;
            inner.stream.take()
        };
        tracing::info!("capture session closed");
        self.emit(SequencerEvent::Closed);
        if let Some(handle) = stream {
            if let Err(e) = self.source.stop_stream(handle).await {
                tracing::warn!(error = %e, stream = handle.id(), "camera stream did not stop");
                let mut inner = self.lock();
                if inner.stream.is_none() {
                    inner.stream = Some(handle);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self, inner: &mut Inner) {
        inner.epoch += 1;
        self.epoch_tx.send_replace(inner.epoch);
    }

    fn emit(&self, event: SequencerEvent) {
        // A dropped receiver just means nobody is watching.
        let _ = self.events.send(event);
    }

    fn if_current<R>(&self, epoch: u64, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
        let mut inner = self.lock();
        if inner.epoch == epoch {
            Some(f(&mut inner))
        } else {
            None
        }
    }

    fn with_session(&self, f: impl FnOnce(&mut CaptureSession)) -> BoothResult<()> {
        let mut inner = self.lock();
        let session = inner
            .session
            .as_mut()
            .ok_or_else(|| BoothError::validation("no capture session started"))?;
        f(session);
        Ok(())
    }

    /// Sleep for `duration` unless the epoch moves on first. Returns whether `epoch` is still
    /// current.
    async fn pause(&self, epoch: u64, duration: Duration) -> bool {
        let mut rx = self.epoch_tx.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = rx.wait_for(|e| *e != epoch) => {}
        }
        self.lock().epoch == epoch
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sequencer.rs"]
mod tests;
