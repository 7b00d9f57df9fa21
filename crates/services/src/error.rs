//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by `AuthStore`.
///
/// Every failure is local to the operation that raised it; nothing here is
/// fatal to the process or to the store's current session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("passwords do not match")]
    PasswordMismatch,
}
