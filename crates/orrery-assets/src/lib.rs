//! Asset loading for the orrery viewer: shader text files and Wavefront OBJ
//! meshes with per-material vertex colors.

mod error;
mod mesh;

pub use error::AssetError;
pub use mesh::{MeshData, load_mesh, parse_obj};

use std::path::Path;

/// Read a text asset (e.g. a shader override) from disk.
pub fn load_text(path: &Path) -> Result<String, AssetError> {
    std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
