//! Timeout-bounded ticket semaphore.
//!
//! This module provides:
//!
//! - [`Semaphore`]: a fixed-capacity ticket pool with a blocking, deadline-
//!   bounded [`Semaphore::acquire`]
//! - [`TicketGuard`]: scope-tied ticket ownership (release on drop)
//! - Observer hooks + real-time metrics for monitoring contention

mod observer;

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::{AcquireError, AcquireResult};

pub use observer::{
    SemaphoreEvent, SemaphoreMetrics, SemaphoreMetricsSnapshot, SemaphoreObserver,
    StdErrSemaphoreObserver,
};

/// A timeout-bounded counting semaphore.
///
/// The semaphore owns a fixed pool of tickets. [`Semaphore::acquire`] claims
/// one, blocking until a ticket is free or the configured timeout elapses;
/// [`Semaphore::release`] returns it. Capping tickets caps how many callers
/// can be inside the guarded work at once.
///
/// All operations are safe to call concurrently from many threads on a shared
/// instance; the number of outstanding tickets never exceeds the capacity.
pub struct Semaphore {
    /// Tickets currently available, in `[0, capacity]`.
    tickets: Mutex<usize>,
    available: Condvar,
    capacity: usize,
    timeout: Duration,
    observer: Option<Arc<dyn SemaphoreObserver>>,
    metrics: Arc<SemaphoreMetrics>,
}

impl Semaphore {
    /// Create a semaphore with `tickets` capacity and the given acquire
    /// timeout.
    ///
    /// Construction never fails and no tickets are held initially.
    /// `tickets == 0` is valid but degenerate: every acquire fails once the
    /// timeout elapses. A zero `timeout` makes [`Semaphore::acquire`]
    /// non-blocking (immediate success or immediate failure).
    pub fn new(tickets: usize, timeout: Duration) -> Self {
        Self {
            tickets: Mutex::new(tickets),
            available: Condvar::new(),
            capacity: tickets,
            timeout,
            observer: None,
            metrics: Arc::new(SemaphoreMetrics::new()),
        }
    }

    /// Attach an observer for semaphore events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn SemaphoreObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time semaphore metrics.
    pub fn metrics(&self) -> Arc<SemaphoreMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Ticket capacity fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Acquire one ticket, blocking until one is free or the timeout elapses.
    ///
    /// Returns `Ok(())` once a ticket is claimed, or
    /// [`AcquireError::NoTickets`] if none became available within the
    /// configured timeout. A failed acquire consumes nothing.
    pub fn acquire(&self) -> AcquireResult<()> {
        let start = Instant::now();
        let mut tickets = self.tickets.lock().expect("semaphore mutex poisoned");
        loop {
            if *tickets > 0 {
                *tickets -= 1;
                drop(tickets);
                let waited = start.elapsed();
                self.metrics.on_acquire(waited);
                self.emit(SemaphoreEvent::TicketAcquired { waited });
                return Ok(());
            }
            // Remaining wait is recomputed per iteration so a spurious wakeup
            // cannot extend the deadline.
            let Some(remaining) = self.timeout.checked_sub(start.elapsed()) else {
                break;
            };
            if remaining.is_zero() {
                break;
            }
            let (guard, _) = self
                .available
                .wait_timeout(tickets, remaining)
                .expect("semaphore mutex poisoned");
            // A wakeup racing the deadline resolves at the top of the loop:
            // a ticket found there is claimed even if the timer has expired.
            tickets = guard;
        }
        drop(tickets);
        let waited = start.elapsed();
        self.metrics.on_timeout(waited);
        self.emit(SemaphoreEvent::AcquireTimedOut { waited });
        Err(AcquireError::NoTickets)
    }

    /// Return one previously acquired ticket to the pool.
    ///
    /// Never blocks and never fails. At most one waiter is woken per release.
    /// Releasing a ticket that was not first acquired is a contract
    /// violation: debug builds assert on it, release builds do not detect it.
    pub fn release(&self) {
        let mut tickets = self.tickets.lock().expect("semaphore mutex poisoned");
        debug_assert!(
            *tickets < self.capacity,
            "release() without a matching acquire()"
        );
        *tickets += 1;
        self.available.notify_one();
        drop(tickets);
        self.metrics.on_release();
        self.emit(SemaphoreEvent::TicketReleased);
    }

    /// True if no tickets are held at this instant.
    ///
    /// Best-effort snapshot for diagnostics: it may be called concurrently
    /// with [`Semaphore::acquire`]/[`Semaphore::release`], and the answer can
    /// be stale by the time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        *self.tickets.lock().expect("semaphore mutex poisoned") == self.capacity
    }

    /// Acquire one ticket and tie it to a guard that releases on drop.
    pub fn acquire_guard(&self) -> AcquireResult<TicketGuard<'_>> {
        self.acquire()?;
        Ok(TicketGuard { semaphore: self })
    }

    /// Run `f` while holding a ticket.
    ///
    /// The ticket is released when `f` returns, or when it unwinds.
    pub fn with_ticket<T>(&self, f: impl FnOnce() -> T) -> AcquireResult<T> {
        let _ticket = self.acquire_guard()?;
        Ok(f())
    }

    fn emit(&self, event: SemaphoreEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// A held ticket, obtained from [`Semaphore::acquire_guard`].
///
/// Dropping the guard releases the ticket, so the one-release-per-acquire
/// contract holds even across early returns and panics.
pub struct TicketGuard<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}
