//! `ticket-semaphore` is a small library for capping the number of concurrent
//! operations a process performs against a resource (e.g. limiting parallel
//! requests to a downstream dependency), using a timeout-bounded
//! [`semaphore::Semaphore`].
//!
//! A semaphore is constructed with a fixed ticket count and an acquire
//! timeout, both immutable afterwards. [`semaphore::Semaphore::acquire`]
//! claims a ticket, blocking until one is free or the timeout elapses
//! (failing with [`AcquireError::NoTickets`]);
//! [`semaphore::Semaphore::release`] hands the ticket back. While a caller
//! holds a ticket, at most `tickets - 1` other callers can hold one too.
//!
//! ## Quick example: cap concurrent calls
//!
//! ```rust
//! use std::time::Duration;
//! use ticket_semaphore::semaphore::Semaphore;
//!
//! # fn call_downstream() {}
//! # fn main() -> Result<(), ticket_semaphore::AcquireError> {
//! // At most 3 concurrent downstream calls; give up after 100ms of waiting.
//! let sem = Semaphore::new(3, Duration::from_millis(100));
//!
//! sem.acquire()?;
//! call_downstream();
//! sem.release();
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarded acquisition
//!
//! [`semaphore::Semaphore::acquire_guard`] ties the release to scope exit, so
//! a ticket cannot leak across early returns or panics:
//!
//! ```rust
//! use std::time::Duration;
//! use ticket_semaphore::semaphore::Semaphore;
//!
//! # fn main() -> Result<(), ticket_semaphore::AcquireError> {
//! let sem = Semaphore::new(1, Duration::ZERO);
//! {
//!     let _ticket = sem.acquire_guard()?;
//!     // ticket held for the rest of this scope
//! }
//! assert!(sem.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Distinguishing timeouts
//!
//! [`AcquireError::NoTickets`] is the only failure mode and is directly
//! comparable:
//!
//! ```rust
//! use std::time::Duration;
//! use ticket_semaphore::AcquireError;
//! use ticket_semaphore::semaphore::Semaphore;
//!
//! let sem = Semaphore::new(0, Duration::ZERO);
//! assert_eq!(sem.acquire(), Err(AcquireError::NoTickets));
//! ```
//!
//! ## Observability
//!
//! Attach a [`semaphore::SemaphoreObserver`] for per-event hooks, or read the
//! built-in metrics at any time:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ticket_semaphore::semaphore::{Semaphore, StdErrSemaphoreObserver};
//!
//! # fn main() -> Result<(), ticket_semaphore::AcquireError> {
//! let sem = Semaphore::new(2, Duration::from_millis(50))
//!     .with_observer(Arc::new(StdErrSemaphoreObserver));
//! let metrics = sem.metrics();
//!
//! sem.with_ticket(|| { /* guarded work */ })?;
//!
//! let snap = metrics.snapshot();
//! assert_eq!(snap.acquired, 1);
//! assert_eq!(snap.released, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`semaphore`]: the ticket semaphore, guard, and observer/metrics hooks
//! - [`error`]: error types used across the crate

pub mod error;
pub mod semaphore;

pub use error::{AcquireError, AcquireResult};
