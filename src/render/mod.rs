pub mod blend;
pub mod blur;
pub mod canvas;
pub mod encode;
pub mod text;
