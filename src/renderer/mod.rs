//! WebGPU rendering module
//!
//! Turns a simulation `Snapshot` into colored triangles. Never mutates the sim.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
