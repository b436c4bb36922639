//! Writes [`TriangleMesh`](lib_geometry::TriangleMesh)es as STL files.
//!
//! Both the binary and the ASCII flavor are supported; binary is the default.

mod error;
mod write;

pub use error::StlError;
pub use write::{save_stl, write_stl, StlFormat};
