//! Batch conversion of glTF/GLB models into STL files for CAD and 3D printing.
//!
//! Every `.glb` and `.gltf` file below a directory is loaded, its scene is flattened into a single
//! mesh, the mesh is rotated from Y-up to Z-up, flipped upside down and scaled from meters to
//! millimeters, and the result is written next to the source with the `.stl` extension.

pub mod batch;
pub mod config;
pub mod convert;
pub mod discovery;
mod error;
pub mod logging;

pub use config::{Command, Config};
pub use error::{ApplicationError, ApplicationResult};
