//! Errors raised by composition operations

use catalog_common::{Error, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompositionError {
    /// A padrão, compositor, or compositor family did not resolve
    #[error("{0}")]
    NotFound(String),

    /// The compositor type tag is neither `ambiente` nor `material`
    #[error("Invalid compositor type: {0}")]
    InvalidCompositor(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CompositionError> for Error {
    fn from(err: CompositionError) -> Self {
        match err {
            CompositionError::NotFound(msg) => Error::NotFound(msg),
            CompositionError::InvalidCompositor(tag) => Error::InvalidCompositor(tag),
            CompositionError::Repository(e) => e.into(),
        }
    }
}
