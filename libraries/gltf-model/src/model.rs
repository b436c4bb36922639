use std::path::Path;

use gltf::{buffer, Document, Gltf};
use lib_geometry::TriangleMesh;
use log::debug;

use crate::{flatten::flatten, LoadError};

/// A parsed glTF document together with the contents of all of its buffers.
pub struct Model {
    /// The glTF JSON structure.
    pub document: Document,
    /// Buffer contents, indexed like the document's buffers.
    pub buffers: Vec<buffer::Data>,
}

impl Model {
    /// Loads a `.gltf` or `.glb` file.
    ///
    /// External buffers are resolved relative to the directory containing `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read, is not valid glTF or references buffers that can't be loaded.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;

        Self::from_slice(&bytes, path.parent())
    }

    /// Parses glTF JSON or a GLB container from memory.
    ///
    /// `base` is the directory external buffer URIs are relative to; without it only
    /// the GLB binary chunk and `data:` URIs can be resolved.
    ///
    /// # Errors
    ///
    /// Fails if `bytes` is not valid glTF or references buffers that can't be loaded.
    pub fn from_slice(bytes: &[u8], base: Option<&Path>) -> Result<Self, LoadError> {
        let Gltf { document, blob } = Gltf::from_slice(bytes)?;
        let buffers = gltf::import_buffers(&document, base, blob)?;

        debug!(
            "loaded glTF document with {} buffer(s), {} mesh(es), {} scene(s)",
            buffers.len(),
            document.meshes().len(),
            document.scenes().len()
        );

        Ok(Self { document, buffers })
    }

    /// Bakes the scene graph into a single mesh in world coordinates.
    ///
    /// # Errors
    ///
    /// Fails if a primitive references vertices it doesn't have or the node hierarchy is not a tree.
    pub fn flatten(&self) -> Result<TriangleMesh, LoadError> {
        flatten(&self.document, &self.buffers)
    }
}

/// Loads a `.gltf` or `.glb` file and flattens its scene into a single mesh.
///
/// # Errors
///
/// See [`Model::load`] and [`Model::flatten`].
pub fn load_mesh(path: &Path) -> Result<TriangleMesh, LoadError> {
    Model::load(path)?.flatten()
}
