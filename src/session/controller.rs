use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::Context;
use tokio::sync::mpsc;

use crate::{
    capture::{
        frame::{ImageInput, StillFrame},
        sequencer::{
            CaptureOutcome, CaptureSequencer, SequencerEvent, SequencerPhase, SequencerSettings,
        },
        session::{CaptureSession, FlashMode},
        source::VideoSource,
    },
    compose::{
        compositor::{ComposeOptions, Compositor},
        editor::edit_result,
    },
    filter::spec::{EditorSettings, FilterSpec},
    foundation::{
        core::{Rgba8, TemplateId},
        error::{BoothError, BoothResult},
    },
    render::encode::{CompositeResult, EncodeSettings},
    templates::{Template, get_template},
};

/// Presentation collaborator that receives finished composites (download, print, ...).
pub trait ResultSink: Send + Sync {
    fn present(&self, result: &CompositeResult, suggested_filename: &str) -> BoothResult<()>;
}

/// Writes every presented result into a directory under its suggested file name.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ResultSink for DirectorySink {
    fn present(&self, result: &CompositeResult, suggested_filename: &str) -> BoothResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.path_for(suggested_filename);
        std::fs::write(&path, &result.bytes)
            .with_context(|| format!("write composite '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = result.bytes.len(), "composite written");
        Ok(())
    }
}

/// Caller overrides for a re-composite without recapture.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositeOverrides {
    pub background: Option<Rgba8>,
    pub filter: Option<FilterSpec>,
}

/// Booth-wide settings the controller applies to every session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    pub timer_seconds: u32,
    pub flash_mode: FlashMode,
    pub device_id: Option<String>,
    pub encode: EncodeSettings,
    /// Fixed decoration seed; a fresh random seed per session when `None`.
    pub decoration_seed: Option<u64>,
    /// Background for templates that allow one, unless a composite overrides it. Black, like
    /// the booth screen; `None` keeps each template's own color.
    pub background: Option<Rgba8>,
    pub sequencer: SequencerSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timer_seconds: 0,
            flash_mode: FlashMode::On,
            device_id: None,
            encode: EncodeSettings::default(),
            decoration_seed: None,
            background: Some(Rgba8::BLACK),
            sequencer: SequencerSettings::default(),
        }
    }
}

#[derive(Default)]
struct ControllerState {
    template: Option<&'static Template>,
    frames: Vec<StillFrame>,
    options: ComposeOptions,
    result: Option<CompositeResult>,
}

/// Glues template selection, the capture sequencer, the compositor and result presentation.
///
/// Holds exactly one capture session at a time; the Video Source is shared with the sequencer.
pub struct SessionController {
    source: Arc<dyn VideoSource>,
    compositor: Arc<Compositor>,
    sequencer: CaptureSequencer,
    settings: SessionSettings,
    state: Mutex<ControllerState>,
}

impl SessionController {
    pub fn new(
        source: Arc<dyn VideoSource>,
        compositor: Arc<Compositor>,
        settings: SessionSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SequencerEvent>) {
        let (sequencer, events) = CaptureSequencer::new(source.clone(), settings.sequencer);
        let controller = Self {
            source,
            compositor,
            sequencer,
            settings,
            state: Mutex::new(ControllerState::default()),
        };
        (controller, events)
    }

    pub fn sequencer(&self) -> &CaptureSequencer {
        &self.sequencer
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn template(&self) -> Option<&'static Template> {
        self.lock().template
    }

    /// Frames handed over by the last completed session.
    pub fn frames(&self) -> Vec<StillFrame> {
        self.lock().frames.clone()
    }

    pub fn result(&self) -> Option<CompositeResult> {
        self.lock().result.clone()
    }

    /// Whether the camera is streaming for a session.
    pub fn is_open(&self) -> bool {
        self.sequencer.stream().is_some()
    }

    pub fn phase(&self) -> SequencerPhase {
        self.sequencer.phase()
    }

    /// Choose the layout for the next session and return how many photos it needs.
    ///
    /// Unknown ids fail without touching the current state.
    pub fn select_template(&self, id: TemplateId) -> BoothResult<usize> {
        let template = get_template(id)?;
        if self.is_open() {
            return Err(BoothError::validation(
                "close the booth before choosing another template",
            ));
        }
        let seed = self
            .settings
            .decoration_seed
            .unwrap_or_else(rand::random::<u64>);
        let mut state = self.lock();
        state.template = Some(template);
        state.frames.clear();
        state.result = None;
        state.options = ComposeOptions {
            seed,
            background: self.settings.background,
            encode: self.settings.encode,
            ..ComposeOptions::default()
        };
        tracing::info!(template = %id, name = template.name, photos = template.required_photos, seed, "template selected");
        Ok(template.required_photos)
    }

    /// Start the camera and a fresh capture session for the selected template.
    ///
    /// A camera that cannot stream fails the attempt with [`BoothError::NoActiveStream`].
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn open(&self) -> BoothResult<()> {
        let template = self
            .template()
            .ok_or_else(|| BoothError::validation("select a template before opening the booth"))?;
        if self.is_open() {
            return Err(BoothError::validation("booth is already open"));
        }
        let session = CaptureSession::new(
            template.required_photos,
            self.settings.timer_seconds,
            self.settings.flash_mode,
        )?;
        let stream = self
            .source
            .start_stream(self.settings.device_id.as_deref())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "camera failed to start"))?;
        {
            let mut state = self.lock();
            state.frames.clear();
            state.result = None;
        }
        self.sequencer.begin(session, stream);
        Ok(())
    }

    /// Forward one shutter press; a completing capture closes the camera and composites.
    pub async fn capture(&self) -> BoothResult<CaptureOutcome> {
        let outcome = self.sequencer.request_capture().await?;
        if let CaptureOutcome::Completed { frames } = &outcome {
            self.on_session_complete(frames.clone()).await?;
        }
        Ok(outcome)
    }

    pub fn remove_frame(&self, index: usize) -> BoothResult<StillFrame> {
        self.sequencer.remove_frame(index)
    }

    /// Take the ordered frames of a finished session, release the camera and composite them.
    ///
    /// A camera that refuses to stop is logged and keeps the booth open; the frames are still
    /// composited.
    pub async fn on_session_complete(&self, frames: Vec<StillFrame>) -> BoothResult<CompositeResult> {
        if let Err(e) = self.sequencer.close().await {
            tracing::warn!(error = %e, "camera still streaming after session complete");
        }
        let (template, options) = {
            let mut state = self.lock();
            let template = state
                .template
                .ok_or_else(|| BoothError::validation("no template selected"))?;
            state.frames = frames.clone();
            (template, state.options.clone())
        };
        let images: Vec<ImageInput> = frames.into_iter().map(ImageInput::from).collect();
        let result = self.run_composite(template, images, options).await?;
        self.lock().result = Some(result.clone());
        Ok(result)
    }

    /// Composite arbitrary images into a template, outside any capture session.
    pub async fn composite(
        &self,
        id: TemplateId,
        images: Vec<ImageInput>,
        overrides: CompositeOverrides,
    ) -> BoothResult<CompositeResult> {
        let template = get_template(id)?;
        let options = {
            let state = self.lock();
            ComposeOptions {
                background: overrides.background.or(self.settings.background),
                filter: overrides.filter,
                ..state.options.clone()
            }
        };
        self.run_composite(template, images, options).await
    }

    /// Re-run the composite of the last session with new overrides; replaces the live result.
    pub async fn recomposite(&self, overrides: CompositeOverrides) -> BoothResult<CompositeResult> {
        let (template, frames, options) = {
            let mut state = self.lock();
            let template = state
                .template
                .ok_or_else(|| BoothError::validation("no template selected"))?;
            if state.frames.is_empty() {
                return Err(BoothError::validation("no captured frames to composite"));
            }
            state.options.background = overrides.background.or(self.settings.background);
            state.options.filter = overrides.filter;
            (template, state.frames.clone(), state.options.clone())
        };
        let images = frames.into_iter().map(ImageInput::from).collect();
        let result = self.run_composite(template, images, options).await?;
        self.lock().result = Some(result.clone());
        Ok(result)
    }

    /// Apply an editor pass to the live result and keep the edited version.
    pub async fn edit(&self, settings: EditorSettings) -> BoothResult<CompositeResult> {
        let current = self
            .result()
            .ok_or_else(|| BoothError::validation("nothing to edit yet"))?;
        let encode = self.settings.encode;
        let edited = tokio::task::spawn_blocking(move || edit_result(&current, &settings, encode))
            .await
            .context("editor task failed")??;
        self.lock().result = Some(edited.clone());
        Ok(edited)
    }

    /// Hand the live result to a presentation collaborator; returns the file name used.
    pub fn export(&self, sink: &dyn ResultSink) -> BoothResult<String> {
        let result = self
            .result()
            .ok_or_else(|| BoothError::validation("no composite to export"))?;
        let filename = result.suggested_filename();
        sink.present(&result, &filename)?;
        Ok(filename)
    }

    /// Discard frames, result and template, cancel pending captures and return the sequencer
    /// to idle.
    ///
    /// State is reset even when the camera fails to stop; that error is returned afterwards and
    /// the booth stays open until a later close succeeds.
    pub async fn start_over(&self) -> BoothResult<()> {
        let stopped = self.sequencer.close().await;
        self.sequencer.reset();
        *self.lock() = ControllerState::default();
        tracing::info!("start over");
        stopped
    }

    /// Leave the camera mid-session: stop the stream and drop everything captured so far.
    pub async fn close(&self) -> BoothResult<()> {
        let stopped = self.sequencer.close().await;
        *self.lock() = ControllerState::default();
        stopped
    }

    async fn run_composite(
        &self,
        template: &'static Template,
        images: Vec<ImageInput>,
        options: ComposeOptions,
    ) -> BoothResult<CompositeResult> {
        let compositor = self.compositor.clone();
        tokio::task::spawn_blocking(move || compositor.composite(template, &images, &options))
            .await
            .context("composite task failed")?
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
