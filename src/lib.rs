//! Inkpond - an animated watercolor pond diorama renderer

pub mod core;
pub mod math;
pub mod sim;
pub mod surface;
pub mod compositor;
pub mod render;
pub mod scene;
