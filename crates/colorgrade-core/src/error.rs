use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphicsError {
    /// A dimension, mip count or data layout violates the creation contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The graphics subsystem accepted the arguments but returned no handle.
    #[error("failed to create {0}")]
    ResourceCreation(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A required effect could not be located or failed to compile.
    #[error("runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

pub type GraphicsResult<T> = Result<T, GraphicsError>;

/// A per-frame failure, tagged with the render pass it happened in.
#[derive(Error, Debug)]
#[error("{pass} pass failed: {source}")]
pub struct PassError {
    pub pass: &'static str,
    pub source: GraphicsError,
}

impl PassError {
    pub fn new(pass: &'static str, source: GraphicsError) -> Self {
        Self { pass, source }
    }
}

pub(crate) fn invalid(msg: impl Into<String>) -> GraphicsError {
    GraphicsError::InvalidArgument(msg.into())
}
