//! Base error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! via `From` or wrap it as one variant; both patterns appear downstream.

use thiserror::Error;

/// The top-level error type for `drc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `drc-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
