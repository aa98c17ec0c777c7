pub mod color;
pub mod crop;
pub mod engine;
pub mod levels;
pub mod spec;
