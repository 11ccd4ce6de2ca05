//! Thin CLI layer: parse args, run the parallel search, print the report.
//! Stdout carries only the report; progress and diagnostics go to stderr.

use clap::{Arg, ArgAction, Command};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use primetally_core::{Interval, SearchReport};

/// Upper bound used when no argument is given.
const DEFAULT_UPPER_BOUND: u64 = 10_000_000;

fn use_color() -> bool {
    std::io::stdout().is_terminal()
        && env::var("NO_COLOR").unwrap_or_default().is_empty()
}

fn error(msg: &str) {
    if use_color() {
        eprintln!("{}", msg.red());
    } else {
        eprintln!("{}", msg);
    }
}

/// Run the search; while it is busy, feed a progress bar on stderr from the
/// workers' shared progress counter. Skipped entirely when stderr is not a
/// terminal, so piped output never sees control characters.
fn run_with_progress(bounds: Interval, threads: usize) -> Result<SearchReport, String> {
    if !std::io::stderr().is_terminal() {
        return primetally_core::count_primes(bounds, threads).map_err(|e| e.to_string());
    }
    let progress = Arc::new(AtomicU64::new(0));
    let (tx, rx) = mpsc::channel();
    let worker_progress = Arc::clone(&progress);
    thread::spawn(move || {
        let result = primetally_core::count_primes_with_progress(bounds, threads, &worker_progress);
        let _ = tx.send(result);
    });
    let bar = ProgressBar::new(bounds.len());
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.dim} {pos}/{len} scanned").unwrap(),
    );
    let tick = Duration::from_millis(80);
    // no timeout: the search joins its workers unconditionally, so we wait
    // just as unconditionally for it
    loop {
        match rx.try_recv() {
            Ok(result) => {
                bar.finish_and_clear();
                return result.map_err(|e| e.to_string());
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                bar.finish_and_clear();
                return Err("search thread terminated unexpectedly".to_string());
            }
            Err(mpsc::TryRecvError::Empty) => {}
        }
        bar.set_position(progress.load(Ordering::Relaxed));
        thread::sleep(tick);
    }
}

fn run() -> Result<(), String> {
    let matches = Command::new("primetally")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count prime numbers in [2, N) with a fixed pool of worker threads")
        .after_help(
            "Examples:\n  primetally\n  primetally 1000000\n  primetally 1000000 --threads 4\n  primetally --json 100000",
        )
        .arg(
            Arg::new("upper")
                .value_name("N")
                .allow_hyphen_values(true)
                .help("Exclusive upper bound of the search interval (default 10000000)"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("T")
                .value_parser(clap::value_parser!(u64).range(1..))
                .help("Worker thread count (default: available CPUs; PRIMETALLY_THREADS also overrides)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Output machine-readable JSON instead of the human report"),
        )
        .get_matches();

    // wall clock starts before the thread count is resolved
    let started = Instant::now();

    let upper = match matches.get_one::<String>("upper") {
        Some(raw) => primetally_core::parse_upper_bound(raw).map_err(|e| e.to_string())?,
        None => DEFAULT_UPPER_BOUND,
    };
    let threads = matches
        .get_one::<u64>("threads")
        .map(|&t| t as usize)
        .or_else(primetally_core::workers_from_env)
        .unwrap_or_else(primetally_core::default_workers);
    let json_out = matches.get_flag("json");

    let bounds = Interval::search_space(upper);

    if !json_out {
        println!("Searching prime numbers in interval [2, {})", upper);
        println!("Creating {} threads", threads);
    }

    let report = if json_out {
        primetally_core::count_primes(bounds, threads).map_err(|e| e.to_string())?
    } else {
        run_with_progress(bounds, threads)?
    };

    // measured after the search has joined every worker and read the tally
    let elapsed = started.elapsed();

    if json_out {
        let doc = serde_json::json!({
            "schemaVersion": "1",
            "bounds": report.bounds,
            "threads": report.threads,
            "count": report.count,
            "elapsedSeconds": elapsed.as_secs_f64(),
            "workers": report.workers,
        });
        println!("{}", serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?);
    } else {
        println!("Found {} prime numbers", report.count);
        println!("Execution time   : {:.5} s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn main() {
    if !use_color() {
        colored::control::set_override(false);
    }

    let code = match std::panic::catch_unwind(|| run()) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error(&e);
            1
        }
        Err(_) => {
            error("An unexpected error occurred. Please report this issue.");
            1
        }
    };
    std::process::exit(code);
}
