//! WebGPU rendering module
//!
//! The scene is built as vertex-colored triangles in cell coordinates, then
//! projected (flat or with a depth tilt) and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Projection, SceneOptions, build_scene, fit_cell};
pub use vertex::Vertex;
