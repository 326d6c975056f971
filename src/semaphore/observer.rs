use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Semaphore events emitted to an attached [`SemaphoreObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemaphoreEvent {
    /// A ticket was claimed, after waiting `waited` (zero when a ticket was
    /// immediately available).
    TicketAcquired { waited: Duration },
    /// No ticket became available within the configured timeout.
    AcquireTimedOut { waited: Duration },
    /// A ticket was returned to the pool.
    TicketReleased,
}

/// Observer hook for semaphore events.
pub trait SemaphoreObserver: Send + Sync {
    fn on_event(&self, event: &SemaphoreEvent);
}

/// A simple stderr logger for semaphore events.
#[derive(Default)]
pub struct StdErrSemaphoreObserver;

impl SemaphoreObserver for StdErrSemaphoreObserver {
    fn on_event(&self, event: &SemaphoreEvent) {
        eprintln!("{event:?}");
    }
}

/// Real-time metrics for a semaphore.
///
/// The semaphore updates these counters as tickets move; callers can snapshot
/// them at any time. Counters are cumulative over the semaphore's lifetime.
pub struct SemaphoreMetrics {
    acquired: AtomicU64,
    timed_out: AtomicU64,
    released: AtomicU64,
    wait_ns: AtomicU64,

    active_tickets: AtomicUsize,
    max_active_tickets: AtomicUsize,
}

impl SemaphoreMetrics {
    pub fn new() -> Self {
        Self {
            acquired: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
            released: AtomicU64::new(0),
            wait_ns: AtomicU64::new(0),
            active_tickets: AtomicUsize::new(0),
            max_active_tickets: AtomicUsize::new(0),
        }
    }

    pub fn on_acquire(&self, waited: Duration) {
        let _ = self.acquired.fetch_add(1, Ordering::SeqCst);
        self.add_wait(waited);
        let now = self.active_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        update_max_usize(&self.max_active_tickets, now);
    }

    pub fn on_timeout(&self, waited: Duration) {
        let _ = self.timed_out.fetch_add(1, Ordering::SeqCst);
        self.add_wait(waited);
    }

    pub fn on_release(&self) {
        let _ = self.released.fetch_add(1, Ordering::SeqCst);
        let _ = self.active_tickets.fetch_sub(1, Ordering::SeqCst);
    }

    fn add_wait(&self, waited: Duration) {
        let add = waited.as_nanos().min(u64::MAX as u128) as u64;
        let _ = self.wait_ns.fetch_add(add, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> SemaphoreMetricsSnapshot {
        SemaphoreMetricsSnapshot {
            acquired: self.acquired.load(Ordering::SeqCst),
            timed_out: self.timed_out.load(Ordering::SeqCst),
            released: self.released.load(Ordering::SeqCst),
            total_wait: Duration::from_nanos(self.wait_ns.load(Ordering::SeqCst)),
            active_tickets: self.active_tickets.load(Ordering::SeqCst),
            max_active_tickets: self.max_active_tickets.load(Ordering::SeqCst),
        }
    }
}

impl Default for SemaphoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn update_max_usize(dst: &AtomicUsize, now: usize) {
    loop {
        let cur = dst.load(Ordering::SeqCst);
        if now <= cur {
            break;
        }
        if dst
            .compare_exchange(cur, now, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            break;
        }
    }
}

/// Immutable snapshot of [`SemaphoreMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SemaphoreMetricsSnapshot {
    /// Successful acquires.
    pub acquired: u64,
    /// Acquires that failed with a timeout.
    pub timed_out: u64,
    /// Tickets returned via release.
    pub released: u64,
    /// Total time spent waiting in acquire, across both outcomes.
    pub total_wait: Duration,
    /// Tickets held at snapshot time.
    pub active_tickets: usize,
    /// High-water mark of concurrently held tickets.
    pub max_active_tickets: usize,
}

impl fmt::Display for SemaphoreMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "acquired={}, timed_out={}, released={}, active_tickets={}, max_active_tickets={}, total_wait={:?}",
            self.acquired,
            self.timed_out,
            self.released,
            self.active_tickets,
            self.max_active_tickets,
            self.total_wait
        )
    }
}
