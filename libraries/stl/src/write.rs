use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use glam::Vec3;
use lib_geometry::{face_normal, TriangleMesh};
use log::debug;

use crate::StlError;

const HEADER_LENGTH: usize = 80;
const HEADER_TAG: &[u8] = b"binary STL exported by gltf2stl";

/// Encoding of the written file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StlFormat {
    /// Compact little-endian encoding, 50 bytes per triangle.
    #[default]
    Binary,
    /// Human readable text encoding.
    Ascii,
}

/// Writes `mesh` as STL to `path`, creating or truncating the file.
///
/// The file stem is used as the solid name of ASCII files.
///
/// # Errors
///
/// Fails if the file cannot be created or written, or if the mesh cannot be encoded.
pub fn save_stl(path: &Path, mesh: &TriangleMesh, format: StlFormat) -> Result<(), StlError> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(&mut writer, mesh, format, &name)?;
    writer.flush()?;

    debug!(
        "wrote {} triangles to {} ({format:?})",
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}

/// Encodes `mesh` as STL into `writer`.
///
/// Face normals are derived from the triangle corners.
/// `name` only shows up in ASCII files.
///
/// # Errors
///
/// Fails if `writer` fails or if the mesh has more triangles than binary STL can count.
pub fn write_stl(
    writer: &mut impl Write,
    mesh: &TriangleMesh,
    format: StlFormat,
    name: &str,
) -> Result<(), StlError> {
    match format {
        StlFormat::Binary => write_binary(writer, mesh),
        StlFormat::Ascii => write_ascii(writer, mesh, name),
    }
}

fn write_binary(writer: &mut impl Write, mesh: &TriangleMesh) -> Result<(), StlError> {
    let triangle_count = binary_triangle_count(mesh.triangle_count())?;

    let mut header = [0_u8; HEADER_LENGTH];
    if let Some(prefix) = header.get_mut(..HEADER_TAG.len()) {
        prefix.copy_from_slice(HEADER_TAG);
    }
    writer.write_all(&header)?;
    writer.write_all(&triangle_count.to_le_bytes())?;

    for [first, second, third] in mesh.triangle_corners() {
        let normal = face_normal(first, second, third);
        for vector in [normal, first, second, third] {
            write_vec3(writer, vector)?;
        }
        // attribute byte count
        writer.write_all(&0_u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_vec3(writer: &mut impl Write, vector: Vec3) -> Result<(), StlError> {
    for component in vector.to_array() {
        writer.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}

fn binary_triangle_count(count: usize) -> Result<u32, StlError> {
    u32::try_from(count).map_err(|_error| StlError::TooManyTriangles(count))
}

fn write_ascii(writer: &mut impl Write, mesh: &TriangleMesh, name: &str) -> Result<(), StlError> {
    let name = solid_name(name);

    writeln!(writer, "solid {name}")?;
    for [first, second, third] in mesh.triangle_corners() {
        let normal = face_normal(first, second, third);
        writeln!(
            writer,
            "  facet normal {:e} {:e} {:e}",
            normal.x, normal.y, normal.z
        )?;
        writeln!(writer, "    outer loop")?;
        for vertex in [first, second, third] {
            writeln!(
                writer,
                "      vertex {:e} {:e} {:e}",
                vertex.x, vertex.y, vertex.z
            )?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;

    Ok(())
}

/// The solid name has to stay on the `solid` line and must not be split by readers.
fn solid_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
