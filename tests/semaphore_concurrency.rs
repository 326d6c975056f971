use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use ticket_semaphore::semaphore::Semaphore;

fn bump_max(dst: &AtomicUsize, now: usize) {
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

#[test]
fn concurrent_holders_never_exceed_capacity() {
    const CAPACITY: usize = 4;
    const WORKERS: usize = 16;
    const ROUNDS: usize = 50;

    let sem = Semaphore::new(CAPACITY, Duration::from_secs(5));
    let inside = AtomicUsize::new(0);
    let max_inside = AtomicUsize::new(0);

    (0..WORKERS).into_par_iter().for_each(|_| {
        for _ in 0..ROUNDS {
            sem.acquire().expect("acquire within generous timeout");
            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
            bump_max(&max_inside, now);

            // Hold the ticket long enough for workers to overlap.
            thread::sleep(Duration::from_micros(200));

            let _ = inside.fetch_sub(1, Ordering::SeqCst);
            sem.release();
        }
    });

    assert!(
        max_inside.load(Ordering::SeqCst) <= CAPACITY,
        "more than {CAPACITY} holders were inside at once"
    );
    assert!(sem.is_empty());
}

#[test]
fn capacity_plus_one_acquire_fails_while_pool_exhausted() {
    let sem = Semaphore::new(2, Duration::from_millis(30));
    sem.acquire().unwrap();
    sem.acquire().unwrap();

    assert!(sem.acquire().is_err());

    sem.release();
    sem.release();
    assert!(sem.is_empty());
}

#[test]
fn repeated_cycles_leave_semaphore_empty() {
    let sem = Semaphore::new(1, Duration::ZERO);
    for _ in 0..100_000 {
        sem.acquire().unwrap();
        sem.release();
    }
    assert!(sem.is_empty());

    // Timeout-expiry path: every attempt fails and nothing is consumed.
    let exhausted = Semaphore::new(0, Duration::ZERO);
    for _ in 0..1_000 {
        assert!(exhausted.acquire().is_err());
    }
    assert!(exhausted.is_empty());
}

#[test]
fn guards_are_concurrency_safe() {
    const CAPACITY: usize = 3;
    const WORKERS: usize = 12;

    let sem = Semaphore::new(CAPACITY, Duration::from_secs(5));
    let inside = AtomicUsize::new(0);
    let max_inside = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..WORKERS {
            s.spawn(|| {
                for _ in 0..25 {
                    let _ticket = sem.acquire_guard().expect("acquire within generous timeout");
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    bump_max(&max_inside, now);
                    thread::sleep(Duration::from_micros(200));
                    let _ = inside.fetch_sub(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert!(max_inside.load(Ordering::SeqCst) <= CAPACITY);
    assert!(sem.is_empty());
}
