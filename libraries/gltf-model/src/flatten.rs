use std::collections::HashSet;

use glam::{Mat4, Vec3};
use gltf::{
    accessor::{DataType, Dimensions},
    buffer,
    mesh::Mode,
    Accessor, Document, Node, Primitive, Semantic,
};
use lib_geometry::{MeshError, TriangleMesh};
use log::{debug, warn};

use crate::LoadError;

/// Bakes the default scene (or the first scene) of `document` into a single mesh.
///
/// Every mesh instance is transformed by the world matrix of its node. Documents without any
/// scene contribute each of their meshes once, untransformed.
pub(crate) fn flatten(
    document: &Document,
    buffers: &[buffer::Data],
) -> Result<TriangleMesh, LoadError> {
    let mut output = TriangleMesh::empty();

    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        debug!("document has no scene, using its meshes as they are");
        for mesh in document.meshes() {
            append_mesh(&mut output, &mesh, Mat4::IDENTITY, buffers)?;
        }
        return Ok(output);
    };

    // depth-first in document order
    let roots = scene.nodes().collect::<Vec<_>>();
    let mut pending = roots
        .into_iter()
        .rev()
        .map(|node| (node, Mat4::IDENTITY))
        .collect::<Vec<(Node<'_>, Mat4)>>();
    let mut visited = HashSet::new();

    while let Some((node, parent_matrix)) = pending.pop() {
        if !visited.insert(node.index()) {
            return Err(LoadError::InvalidHierarchy { node: node.index() });
        }

        let world_matrix =
            parent_matrix * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            append_mesh(&mut output, &mesh, world_matrix, buffers)?;
        }

        let children = node.children().collect::<Vec<_>>();
        pending.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, world_matrix)),
        );
    }

    Ok(output)
}

fn append_mesh(
    output: &mut TriangleMesh,
    mesh: &gltf::Mesh<'_>,
    world_matrix: Mat4,
    buffers: &[buffer::Data],
) -> Result<(), LoadError> {
    let mesh_name = mesh.name().unwrap_or("unnamed");

    for primitive in mesh.primitives() {
        match read_primitive(&primitive, buffers)? {
            Some(part) => output.append(&part, world_matrix)?,
            None => warn!(
                "skipping primitive {} of mesh {} ({mesh_name}): no surface to export",
                primitive.index(),
                mesh.index()
            ),
        }
    }

    Ok(())
}

/// Reads the triangles of `primitive`, or `None` if it has no surface.
fn read_primitive(
    primitive: &Primitive<'_>,
    buffers: &[buffer::Data],
) -> Result<Option<TriangleMesh>, LoadError> {
    let Some(position_accessor) = primitive.get(&Semantic::Positions) else {
        debug!("primitive {} has no POSITION attribute", primitive.index());
        return Ok(None);
    };
    check_accessor(&position_accessor, |data_type, dimensions| {
        data_type == DataType::F32 && dimensions == Dimensions::Vec3
    })?;
    if let Some(index_accessor) = primitive.indices() {
        check_accessor(&index_accessor, |data_type, dimensions| {
            matches!(data_type, DataType::U8 | DataType::U16 | DataType::U32)
                && dimensions == Dimensions::Scalar
        })?;
    }

    let reader =
        primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions = reader
        .read_positions()
        .ok_or_else(|| outside_of_buffer(&position_accessor))?
        .map(Vec3::from)
        .collect::<Vec<_>>();

    let indices = match primitive.indices() {
        Some(index_accessor) => reader
            .read_indices()
            .ok_or_else(|| outside_of_buffer(&index_accessor))?
            .into_u32()
            .collect::<Vec<_>>(),
        None => {
            let vertex_count = u32::try_from(positions.len())
                .map_err(|_error| MeshError::TooManyVertices(positions.len()))?;
            (0..vertex_count).collect()
        }
    };

    let mode = primitive.mode();
    let Some(triangles) = triangulate(mode, &indices) else {
        debug!("primitive {} is drawn as {mode:?}", primitive.index());
        return Ok(None);
    };

    Ok(Some(TriangleMesh::new(positions, triangles)?))
}

/// Rejects accessors the readers of `gltf` would panic on or silently misread.
///
/// `expected` decides whether the accessor's component type and dimensions fit its use.
fn check_accessor(
    accessor: &Accessor<'_>,
    expected: impl Fn(DataType, Dimensions) -> bool,
) -> Result<(), LoadError> {
    let invalid = |problem| LoadError::InvalidAccessor {
        accessor: accessor.index(),
        problem,
    };

    if !expected(accessor.data_type(), accessor.dimensions()) {
        return Err(invalid("has an unsupported component type or dimension"));
    }
    if accessor.count() == 0 {
        return Err(invalid("is empty"));
    }

    match (accessor.view(), accessor.sparse()) {
        (None, None) => return Err(invalid("has no buffer view")),
        (Some(view), _) => {
            if !fits_into(&view, accessor.offset(), accessor.count(), accessor.size()) {
                return Err(invalid("reaches beyond its buffer view"));
            }
        }
        (None, Some(_)) => {}
    }

    if let Some(sparse) = accessor.sparse() {
        let indices = sparse.indices();
        let values = sparse.values();
        if sparse.count() == 0
            || !fits_into(
                &indices.view(),
                indices.offset(),
                sparse.count(),
                indices.index_type().size(),
            )
            || !fits_into(
                &values.view(),
                values.offset(),
                sparse.count(),
                accessor.size(),
            )
        {
            return Err(invalid("has malformed sparse storage"));
        }
    }

    Ok(())
}

/// Whether `count` elements of `element_size` bytes starting at `offset` lie within `view`.
fn fits_into(view: &buffer::View<'_>, offset: usize, count: usize, element_size: usize) -> bool {
    let stride = view.stride().unwrap_or(element_size);

    let end = count
        .checked_sub(1)
        .and_then(|last| stride.checked_mul(last))
        .and_then(|span| span.checked_add(offset))
        .and_then(|span| span.checked_add(element_size));

    stride >= element_size
        && view.offset().checked_add(view.length()).is_some()
        && end.is_some_and(|end| end <= view.length())
}

fn outside_of_buffer(accessor: &Accessor<'_>) -> LoadError {
    LoadError::InvalidAccessor {
        accessor: accessor.index(),
        problem: "points outside of its buffer",
    }
}

/// Converts an index list drawn in `mode` into a triangle list.
///
/// Returns `None` for point and line modes. Incomplete trailing triangles are dropped.
fn triangulate(mode: Mode, indices: &[u32]) -> Option<Vec<[u32; 3]>> {
    let triangles = match mode {
        Mode::Triangles => indices
            .chunks_exact(3)
            .filter_map(|chunk| <[u32; 3]>::try_from(chunk).ok())
            .collect(),
        // every other triangle of a strip is wound the other way round
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .filter_map(|(position, window)| match *window {
                [first, second, third] if position % 2 == 0 => Some([first, second, third]),
                [first, second, third] => Some([first, third, second]),
                _ => None,
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&hub, rim)) => rim
                .windows(2)
                .filter_map(|pair| match *pair {
                    [first, second] => Some([first, second, hub]),
                    _ => None,
                })
                .collect(),
            None => Vec::new(),
        },
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => return None,
    };

    Some(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_list_drops_incomplete_tail() {
        assert_eq!(
            triangulate(Mode::Triangles, &[0, 1, 2, 2, 1, 3, 4]),
            Some(vec![[0, 1, 2], [2, 1, 3]])
        );
    }

    #[test]
    fn strip_alternates_winding() {
        assert_eq!(
            triangulate(Mode::TriangleStrip, &[0, 1, 2, 3, 4]),
            Some(vec![[0, 1, 2], [1, 3, 2], [2, 3, 4]])
        );
    }

    #[test]
    fn fan_shares_first_vertex() {
        assert_eq!(
            triangulate(Mode::TriangleFan, &[0, 1, 2, 3]),
            Some(vec![[1, 2, 0], [2, 3, 0]])
        );
    }

    #[test]
    fn short_inputs_yield_no_triangles() {
        assert_eq!(triangulate(Mode::TriangleStrip, &[0, 1]), Some(Vec::new()));
        assert_eq!(triangulate(Mode::TriangleFan, &[]), Some(Vec::new()));
    }

    #[test]
    fn points_and_lines_have_no_surface() {
        for mode in [Mode::Points, Mode::Lines, Mode::LineLoop, Mode::LineStrip] {
            assert_eq!(triangulate(mode, &[0, 1, 2]), None, "{mode:?}");
        }
    }
}
