pub mod info;
pub mod overlays;
pub mod render;
