//! Rendering system and GPU interfaces

pub mod camera_buffer;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod target;
pub mod window;

pub use camera_buffer::{CameraBuffer, CameraUniform};
pub use context::GpuContext;
pub use target::SceneTargets;
