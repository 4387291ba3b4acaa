//! Render pipelines for the diorama scene pass.

pub mod glow;
pub mod grass;
pub mod mesh;
pub mod surface;

pub use glow::GlowPipeline;
pub use grass::GrassPipeline;
pub use mesh::MeshPipeline;
pub use surface::SurfacePipeline;
