use std::path::Path;

use anyhow::Context;
use lib_geometry::ExportTransform;
use lib_gltf_model::load_mesh;
use lib_stl::{save_stl, StlFormat};
use log::{debug, warn};

/// How a single file gets converted.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Applied to the flattened mesh before it is written.
    pub transform: ExportTransform,
    /// Encoding of the written file.
    pub format: StlFormat,
}

/// Converts the glTF file `source` into the STL file `destination`.
///
/// Returns the number of written triangles.
///
/// # Errors
///
/// Fails if `source` can't be loaded or `destination` can't be written.
pub fn convert(
    source: &Path,
    destination: &Path,
    options: &ConvertOptions,
) -> anyhow::Result<usize> {
    let mut mesh = load_mesh(source).with_context(|| format!("loading {}", source.display()))?;

    if mesh.is_empty() {
        warn!("{} contains no triangles", source.display());
    }
    if let Some((min, max)) = mesh.bounds() {
        debug!("{}: bounds {min} .. {max} before export", source.display());
    }

    mesh.apply_transform(options.transform.matrix());

    save_stl(destination, &mesh, options.format)
        .with_context(|| format!("writing {}", destination.display()))?;

    Ok(mesh.triangle_count())
}
