use std::{
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use lib_geometry::MeshError;

/// Failure to turn a glTF file into a mesh.
#[derive(Debug)]
pub enum LoadError {
    /// The source file could not be read.
    Read {
        /// The file that was attempted to be read.
        path: PathBuf,
        /// What went wrong.
        source: io::Error,
    },
    /// The document is malformed or one of its buffers could not be resolved.
    Gltf(gltf::Error),
    /// A primitive's indices don't match its vertices.
    Mesh(MeshError),
    /// An accessor can't be read as the vertex positions or indices it is used for.
    InvalidAccessor {
        /// Index of the accessor.
        accessor: usize,
        /// What is wrong with it.
        problem: &'static str,
    },
    /// A node is reachable more than once, so the node hierarchy is not a tree.
    InvalidHierarchy {
        /// Index of the node that was reached twice.
        node: usize,
    },
}

impl Display for LoadError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read { path, source } => {
                write!(formatter, "failed to read {}: {source}", path.display())
            }
            LoadError::Gltf(error) => write!(formatter, "invalid glTF data: {error}"),
            LoadError::Mesh(error) => write!(formatter, "invalid mesh data: {error}"),
            LoadError::InvalidAccessor { accessor, problem } => {
                write!(formatter, "accessor {accessor} {problem}")
            }
            LoadError::InvalidHierarchy { node } => {
                write!(formatter, "node {node} appears more than once in the scene graph")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Read { source, .. } => Some(source),
            LoadError::Gltf(error) => Some(error),
            LoadError::Mesh(error) => Some(error),
            LoadError::InvalidAccessor { .. } | LoadError::InvalidHierarchy { .. } => None,
        }
    }
}

impl From<gltf::Error> for LoadError {
    fn from(value: gltf::Error) -> Self {
        Self::Gltf(value)
    }
}

impl From<MeshError> for LoadError {
    fn from(value: MeshError) -> Self {
        Self::Mesh(value)
    }
}
