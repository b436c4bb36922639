//! Triangle meshes and the affine transforms applied to them on export.

mod mesh;
mod transform;

pub use mesh::{face_normal, MeshError, TriangleMesh};
pub use transform::{
    flip_upside_down, meters_to_millimeters, y_up_to_z_up, ExportTransform,
    MILLIMETERS_PER_METER,
};
