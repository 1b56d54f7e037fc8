//! Error types for asset loading and GPU resource setup.
//!
//! Nothing here crosses the frame loop: these errors only surface while the scene is
//! being built, where the caller decides whether to abort or continue with a placeholder.

use std::path::PathBuf;

/// Failures raised by the geometry, texture and shader collaborators
#[derive(thiserror::Error, Debug)]
pub enum GfxError {
    /// A texture file could not be read or decoded
    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A mesh file could not be parsed
    #[error("failed to load mesh {path}: {source}")]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    /// A mesh file parsed but contained no geometry
    #[error("mesh {0} contains no models")]
    EmptyMesh(PathBuf),

    /// A shader stage source file could not be read
    #[error("failed to read shader stage {path}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shader stage compiled but wgpu rejected it during validation
    #[error("shader program '{label}' failed validation: {message}")]
    ShaderValidation { label: String, message: String },
}
