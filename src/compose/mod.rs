pub mod compositor;
pub mod editor;
