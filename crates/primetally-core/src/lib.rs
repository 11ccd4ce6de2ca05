//! Core library for primetally: interval partitioning, trial-division
//! primality, and the fixed-pool parallel search. Used by the CLI binary;
//! the pieces are reusable on their own.

pub mod error;
pub mod interval;
pub mod primality;
pub mod search;
pub mod utils;

// Re-export main API for CLI
pub use error::SearchError;
pub use interval::{parse_upper_bound, partition, Interval};
pub use primality::{is_prime, sieve_count};
pub use search::{
    count_primes, count_primes_with_progress, default_workers, workers_from_env, SearchReport,
    WorkerStats,
};
