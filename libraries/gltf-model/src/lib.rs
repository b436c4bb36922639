//! Loads glTF 2.0 models (`.gltf` and `.glb`) as a single [`TriangleMesh`](lib_geometry::TriangleMesh).

mod error;
mod flatten;
mod model;

pub use error::LoadError;
pub use model::{load_mesh, Model};
