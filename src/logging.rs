// Debug logging for Arcade Pong
// The TUI owns stdout, so tracing output goes to a file enabled via --debug

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::SystemTime;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PATH: &str = "/tmp/arcade-pong.log";

/// Default filter when RUST_LOG is not set
const DEFAULT_FILTER: &str = "debug";

/// Install a file-backed tracing subscriber
///
/// # Behavior
/// - `enabled == false`: nothing is installed and every `tracing` macro is a no-op
/// - `enabled == true`: truncates the log file, writes a header and routes all
///   events there, filtered by `RUST_LOG` (default `debug`)
pub fn init(enabled: bool) -> io::Result<()> {
    if !enabled {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE_PATH)?;

    writeln!(file, "=== Arcade Pong Debug Log ===")?;
    writeln!(file, "Session started: {:?}", SystemTime::now())?;
    writeln!(file, "To monitor: tail -f {}", LOG_FILE_PATH)?;
    writeln!(file, "========================================\n")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(io::Error::other)
}
