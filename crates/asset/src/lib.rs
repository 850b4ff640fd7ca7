//! OBJ model loading: a line-oriented parser for the Wavefront OBJ text
//! format plus the post-processing that derives planar texture coordinates
//! and an interleaved vertex buffer from the parsed geometry.

use std::{io, path::PathBuf};

use thiserror::Error;

pub mod model;
pub mod obj;

/// Failures raised while loading or post-processing an OBJ model.
#[derive(Debug, Error)]
pub enum ObjError {
    /// The path does not name an OBJ file; nothing was opened.
    #[error("not an OBJ file: {}", .0.display())]
    UnrecognizedFormat(PathBuf),
    #[error("failed to read OBJ data: {0}")]
    Io(#[from] io::Error),
    #[error("malformed OBJ data on line {line}: {message}")]
    MalformedData { line: usize, message: String },
    #[error("cannot compute the centroid of a model with no positions")]
    EmptyModel,
    #[error(
        "combined buffer needs one texture coordinate per position \
         ({positions} positions, {tex_coords} texture coordinates)"
    )]
    InconsistentBufferSize { positions: usize, tex_coords: usize },
}

impl ObjError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedData {
            line,
            message: message.into(),
        }
    }
}

pub type ObjResult<T> = Result<T, ObjError>;
