pub mod frame;
pub mod sequencer;
pub mod session;
pub mod source;
