//! Error types for secret loading.
//!
//! Neither type ever escapes [`crate::loader::load`]: both are logged and
//! recorded on the [`crate::loader::LoadReport`] instead.

use thiserror::Error;

/// Failure to fetch a single parameter from the remote store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The parameter list contained a blank entry.
    #[error("parameter name is empty")]
    EmptyName,

    /// The remote store rejected or failed the request.
    #[error("parameter store request failed: {0}")]
    Remote(String),

    /// The remote store answered without a value.
    #[error("parameter has no value")]
    MissingValue,
}

/// Failure that prevents a backend from loading anything at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A setting required by the selected backend is unset or blank.
    #[error("{0} not set")]
    MissingSetting(&'static str),

    /// The parameter store client could not be constructed.
    #[error("parameter store client unavailable: {0}")]
    ClientUnavailable(String),
}
