use thiserror::Error;

/// Convenience result type for semaphore operations.
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Error type returned by [`crate::semaphore::Semaphore::acquire`].
///
/// There is exactly one failure mode, so callers can test for a timeout
/// directly with `==` (the variants derive `PartialEq`/`Eq`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// No ticket became available within the configured timeout.
    #[error("could not acquire semaphore ticket")]
    NoTickets,
}
