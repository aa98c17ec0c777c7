//! Photobooth core: timed multi-shot capture sequencing and deterministic template compositing.
//!
//! The crate is layered bottom-up:
//!
//! - [`filter`]: per-image cover-crop, color filter chain, levels and sharpening
//! - [`render`]: raster surface over `vello_cpu`, text, blur and encoding
//! - [`compose`]: the compositor that runs a template's draw routine, plus the re-edit pass
//! - [`templates`]: the compiled-in layout catalog
//! - [`capture`]: Video Source abstraction and the capture sequencer state machine
//! - [`session`]: the controller tying selection, capture, compositing and export together
#![forbid(unsafe_code)]

pub mod capture;
pub mod compose;
pub mod config;
pub mod filter;
pub mod foundation;
pub mod logging;
pub mod render;
pub mod session;
pub mod templates;

pub use capture::{
    frame::{ImageInput, StillFrame},
    sequencer::{CaptureOutcome, CaptureSequencer, SequencerEvent, SequencerPhase, SequencerSettings},
    session::{CaptureSession, FlashMode},
    source::{DeviceInfo, DirectorySource, PatternSource, StreamHandle, VideoSource},
};
pub use compose::{
    compositor::{ComposeOptions, Compositor, DrawContext, Slot},
    editor::edit_result,
};
pub use config::BoothConfig;
pub use filter::{
    engine::{FilteredImage, SlotMask, apply_filters},
    spec::{Adjustments, EditorSettings, FilterSpec, Preset},
};
pub use foundation::{
    core::{Canvas, Rgba8, TemplateId},
    error::{BoothError, BoothResult},
};
pub use render::{
    encode::{CompositeResult, EncodeSettings, OutputFormat},
    text::{FontBook, FontRole},
};
pub use session::controller::{
    CompositeOverrides, DirectorySink, ResultSink, SessionController, SessionSettings,
};
pub use templates::{Template, get_template, list_templates};
