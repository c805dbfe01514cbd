//! Error types for the core library

use thiserror::Error;

/// Binding table errors
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("no binding for key: {0}")]
    NotBound(String),
}
