//! Renderable resources driven by the animation core.

pub mod mesh;

pub use mesh::{Mesh, skin_matrix};
