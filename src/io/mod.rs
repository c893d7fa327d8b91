use thiserror::Error;

use crate::mesh::triangle_mesh::MeshError;

pub mod obj;

pub use obj::{ObjReader, ObjWriter};

/// Reasons a mesh could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
