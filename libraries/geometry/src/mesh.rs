use std::fmt::{self, Display};

use glam::{Mat4, Vec3};

/// Reasons why a set of positions and triangles does not form a valid mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A triangle refers to a vertex that doesn't exist.
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices the index was checked against.
        vertex_count: usize,
    },
    /// The vertex count exceeds what a `u32` index can address.
    TooManyVertices(usize),
}

impl Display for MeshError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                formatter,
                "triangle index {index} is out of range for {vertex_count} vertices"
            ),
            MeshError::TooManyVertices(count) => {
                write!(formatter, "{count} vertices cannot be addressed by u32 indices")
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// An indexed triangle soup in a single coordinate space.
///
/// Triangles are wound counter-clockwise when seen from outside.
/// Every index stored in `triangles` is guaranteed to address an element of `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh after checking that all triangles refer to existing vertices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfRange`] for the first dangling index and
    /// [`MeshError::TooManyVertices`] if `positions` cannot be addressed by `u32` indices.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        if u32::try_from(vertex_count).is_err() {
            return Err(MeshError::TooManyVertices(vertex_count));
        }

        if let Some(&index) = triangles
            .iter()
            .flatten()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            positions,
            triangles,
        })
    }

    /// A mesh without vertices, ready to [`append`](Self::append) to.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex indices, three per triangle.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh without triangles has no surface, even if it carries vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends `other` after moving its vertices by `transform`.
    ///
    /// The triangles of `other` are re-based onto the vertices appended to `self`.
    /// A mirroring `transform` reverses the winding of the appended triangles.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::TooManyVertices`] if the combined mesh would exceed the `u32` index range.
    /// `self` is left unchanged in that case.
    pub fn append(&mut self, other: &TriangleMesh, transform: Mat4) -> Result<(), MeshError> {
        let combined = self.positions.len() + other.positions.len();
        if u32::try_from(combined).is_err() {
            return Err(MeshError::TooManyVertices(combined));
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the combined vertex count fits into u32"
        )]
        let base = self.positions.len() as u32;

        let mirrored = is_mirroring(transform);
        self.positions.extend(
            other
                .positions
                .iter()
                .map(|&position| transform.transform_point3(position)),
        );
        self.triangles
            .extend(other.triangles.iter().map(|&[first, second, third]| {
                if mirrored {
                    [base + first, base + third, base + second]
                } else {
                    [base + first, base + second, base + third]
                }
            }));

        Ok(())
    }

    /// Moves every vertex by `transform` (an affine matrix).
    ///
    /// Mirroring transforms turn the surface inside out, so the winding of all triangles is
    /// reversed to keep their front faces pointing outward.
    pub fn apply_transform(&mut self, transform: Mat4) {
        for position in &mut self.positions {
            *position = transform.transform_point3(*position);
        }

        if is_mirroring(transform) {
            for triangle in &mut self.triangles {
                triangle.swap(1, 2);
            }
        }
    }

    /// Axis-aligned bounding box as `(min, max)` over all vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let (first, rest) = self.positions.split_first()?;
        Some(rest.iter().fold((*first, *first), |(min, max), &position| {
            (min.min(position), max.max(position))
        }))
    }

    /// Iterates over the corner positions of each triangle.
    pub fn triangle_corners(&self) -> impl ExactSizeIterator<Item = [Vec3; 3]> + '_ {
        self.triangles.iter().map(|triangle| {
            // indices were validated on construction
            triangle.map(|index| {
                self.positions
                    .get(index as usize)
                    .copied()
                    .unwrap_or_default()
            })
        })
    }
}

fn is_mirroring(transform: Mat4) -> bool {
    transform.determinant() < 0.0
}

/// Unit normal of the triangle `(first, second, third)` by the right-hand rule.
///
/// Degenerate triangles yield [`Vec3::ZERO`].
#[must_use]
pub fn face_normal(first: Vec3, second: Vec3, third: Vec3) -> Vec3 {
    (second - first).cross(third - first).normalize_or_zero()
}
