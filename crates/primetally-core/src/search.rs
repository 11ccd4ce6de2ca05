//! Parallel prime search: one worker per sub-interval, one shared tally.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use crate::error::SearchError;
use crate::interval::{partition, Interval};
use crate::primality::is_prime;
use crate::utils;

/// Default worker count: one per available CPU. num_cpus already reports at
/// least 1, but the floor stays explicit; a zero here would put a divide by
/// zero into the partitioner.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Worker count from PRIMETALLY_THREADS, when set to a number. Zero is
/// coerced to 1 rather than rejected, same as the hardware-detection path.
pub fn workers_from_env() -> Option<usize> {
    env::var("PRIMETALLY_THREADS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .map(|t| t.max(1))
}

/// What one worker saw: its slice of the range and the primes it added.
#[derive(Clone, Debug, Serialize)]
pub struct WorkerStats {
    pub interval: Interval,
    pub found: u64,
    #[serde(rename = "elapsedSeconds", serialize_with = "secs_f64")]
    pub elapsed: Duration,
}

/// Outcome of one parallel search: the final tally plus how it was produced.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub bounds: Interval,
    pub threads: usize,
    pub count: u64,
    pub workers: Vec<WorkerStats>,
}

/// Count primes in `bounds` across `threads` workers. Partitions the range
/// once, spawns one worker per sub-interval, joins them all, then reads the
/// shared tally.
pub fn count_primes(bounds: Interval, threads: usize) -> Result<SearchReport, SearchError> {
    run(bounds, threads, None)
}

/// Same as [`count_primes`], additionally bumping `progress` once per
/// integer scanned so a caller can render completion out of band.
pub fn count_primes_with_progress(
    bounds: Interval,
    threads: usize,
    progress: &AtomicU64,
) -> Result<SearchReport, SearchError> {
    run(bounds, threads, Some(progress))
}

fn run(
    bounds: Interval,
    threads: usize,
    progress: Option<&AtomicU64>,
) -> Result<SearchReport, SearchError> {
    let intervals = partition(bounds, threads)?;
    let tally = AtomicU64::new(0);

    let joined: Vec<thread::Result<WorkerStats>> = thread::scope(|scope| {
        let handles: Vec<_> = intervals
            .into_iter()
            .enumerate()
            .map(|(index, interval)| {
                let task = WorkerTask {
                    index,
                    interval,
                    tally: &tally,
                    progress,
                };
                scope.spawn(move || task.scan())
            })
            .collect();
        // join barrier: every worker is awaited here, unconditionally
        handles.into_iter().map(|handle| handle.join()).collect()
    });

    let mut workers = Vec::with_capacity(joined.len());
    for (index, outcome) in joined.into_iter().enumerate() {
        let stats = outcome.map_err(|_| SearchError::WorkerPanicked { worker: index })?;
        workers.push(stats);
    }

    // every worker has been joined; the tally is final
    let count = tally.load(Ordering::Relaxed);
    Ok(SearchReport {
        bounds,
        threads,
        count,
        workers,
    })
}

/// One interval bound to the shared tally. Created by the driver, consumed
/// entirely within one worker's lifetime.
struct WorkerTask<'a> {
    index: usize,
    interval: Interval,
    tally: &'a AtomicU64,
    progress: Option<&'a AtomicU64>,
}

impl WorkerTask<'_> {
    /// Scan the interval, bumping the shared tally once per prime found.
    fn scan(self) -> WorkerStats {
        let started = Instant::now();
        let mut found: u64 = 0;
        for x in self.interval.left..self.interval.right {
            if is_prime(x) {
                // relaxed is enough: the join barrier orders the final read
                self.tally.fetch_add(1, Ordering::Relaxed);
                found += 1;
            }
            if let Some(progress) = self.progress {
                progress.fetch_add(1, Ordering::Relaxed);
            }
        }
        let elapsed = started.elapsed();
        utils::debug(&format!(
            "worker {}: {} found {} primes in {:.3?}",
            self.index, self.interval, found, elapsed
        ));
        WorkerStats {
            interval: self.interval,
            found,
            elapsed,
        }
    }
}

fn secs_f64<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::sieve_count;

    #[test]
    fn test_count_matches_sieve() {
        for upper in [100, 1_000, 50_000] {
            let report = count_primes(Interval::search_space(upper), 4).expect("search");
            assert_eq!(report.count, sieve_count(upper), "upper bound {upper}");
        }
    }

    #[test]
    fn test_reference_counts() {
        let scenarios = [(1_000, 168), (10_000, 1_229), (100_000, 9_592)];
        for (upper, expected) in scenarios {
            let report =
                count_primes(Interval::search_space(upper), default_workers()).expect("search");
            assert_eq!(report.count, expected, "upper bound {upper}");
        }
    }

    #[test]
    #[ignore]
    fn test_reference_counts_large() {
        let scenarios = [(1_000_000, 78_498), (10_000_000, 664_579)];
        for (upper, expected) in scenarios {
            let report =
                count_primes(Interval::search_space(upper), default_workers()).expect("search");
            assert_eq!(report.count, expected, "upper bound {upper}");
        }
    }

    #[test]
    fn test_count_invariant_to_thread_count() {
        let bounds = Interval::search_space(10_000);
        for threads in [1, 32, 256] {
            let report = count_primes(bounds, threads).expect("search");
            assert_eq!(report.count, 1_229, "{threads} threads");
            assert_eq!(report.workers.len(), threads);
        }
    }

    #[test]
    fn test_degenerate_ranges_count_zero() {
        for upper in [0, 1, 2] {
            let report = count_primes(Interval::search_space(upper), 4).expect("search");
            assert_eq!(report.count, 0, "upper bound {upper}");
            assert!(report.workers.iter().all(|w| w.interval.is_empty()));
        }
    }

    #[test]
    fn test_single_element_range() {
        // [2, 3) holds only 2, which is prime
        let report = count_primes(Interval::search_space(3), 4).expect("search");
        assert_eq!(report.count, 1);
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let bounds = Interval::search_space(20_000);
        let first = count_primes(bounds, 8).expect("search");
        let second = count_primes(bounds, 8).expect("search");
        assert_eq!(first.count, second.count);
    }

    #[test]
    fn test_worker_deltas_sum_to_tally() {
        let report = count_primes(Interval::search_space(50_000), 8).expect("search");
        let by_workers: u64 = report.workers.iter().map(|w| w.found).sum();
        assert_eq!(by_workers, report.count);
    }

    #[test]
    fn test_worker_delta_equals_sequential_count_of_its_interval() {
        let report = count_primes(Interval::search_space(10_000), 8).expect("search");
        for stats in &report.workers {
            let sequential = (stats.interval.left..stats.interval.right)
                .filter(|&x| is_prime(x))
                .count() as u64;
            assert_eq!(stats.found, sequential, "interval {}", stats.interval);
        }
    }

    #[test]
    fn test_progress_counts_every_element() {
        let bounds = Interval::search_space(10_000);
        let progress = AtomicU64::new(0);
        count_primes_with_progress(bounds, 4, &progress).expect("search");
        assert_eq!(progress.load(Ordering::Relaxed), bounds.len());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = count_primes(Interval::search_space(1_000), 0).unwrap_err();
        assert_eq!(err, SearchError::ZeroWorkers);
    }

    #[test]
    fn test_default_workers_is_at_least_one() {
        assert!(default_workers() >= 1);
    }
}
