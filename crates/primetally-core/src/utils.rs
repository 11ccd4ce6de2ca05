//! Shared helpers: env-gated, timestamped debug logging.

use std::env;
use std::sync::OnceLock;

use chrono::Local;

static DEBUG: OnceLock<bool> = OnceLock::new();

/// True when PRIMETALLY_DEBUG is set to 1/true. Looked up once per process.
pub fn debug_enabled() -> bool {
    *DEBUG.get_or_init(|| {
        env::var("PRIMETALLY_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// Timestamped diagnostic line on stderr; no-op unless PRIMETALLY_DEBUG is
/// set. Diagnostics never go to stdout, which is reserved for the report.
pub fn debug(message: &str) {
    if debug_enabled() {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        eprintln!("[{}] {}", timestamp, message);
    }
}
