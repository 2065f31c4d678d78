//! Engine error kinds.
//!
//! Two kinds cover every failure the symbolic core can raise. A
//! `NotImplemented` marks a well-formed construct outside the supported
//! subset and aborts only the current entry point's analysis; an
//! `Invariant` marks a broken internal contract (context stack mismatch,
//! kind error, unknown name) and is fatal for the whole run.

use std::fmt::Display;

use thiserror::Error;

/// Error raised by the symbolic execution core.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A well-formed construct the core does not support.
    #[error("support for `{0}` is not implemented")]
    NotImplemented(String),

    /// A broken internal contract; indicates a driver or engine bug.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    /// Builds a [`EngineError::NotImplemented`] from anything displayable.
    pub fn not_implemented(what: impl Display) -> Self {
        EngineError::NotImplemented(what.to_string())
    }

    /// Builds an [`EngineError::Invariant`] from anything displayable.
    pub fn invariant(what: impl Display) -> Self {
        EngineError::Invariant(what.to_string())
    }
}

/// Result type used throughout the symbolic execution crates.
pub type EngineResult<T> = Result<T, EngineError>;
