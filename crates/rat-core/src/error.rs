//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` via `From`
//! where a core operation can fail inside them.

use thiserror::Error;

use crate::TechId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} does not fit in a technology set (capacity {cap})", cap = crate::TechSet::CAPACITY)]
    TechOutOfRange(TechId),

    #[error("tick duration must be positive")]
    ZeroTickDuration,
}

/// Shorthand result type for `rat-core`.
pub type CoreResult<T> = Result<T, CoreError>;
