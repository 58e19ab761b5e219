//! Log bridge for the msdf-text binary.
//!
//! Every workspace crate logs through the `log` facade; this module installs
//! the single `log::Log` implementation that receives those records. Lines
//! are timestamped and written to stderr, and to a log file when one is
//! given.
//!
//! Level precedence: the `--log-level` CLI flag, then `RUST_LOG`, then
//! `warn`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use msdf_text_config::LogLevel;
use parking_lot::Mutex;

struct LogBridge {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(&get_timestamp(), record);

        // Logging must never take the process down, so write failures are ignored
        let _ = writeln!(io::stderr().lock(), "{line}");
        if let Some(file) = &self.file {
            let _ = writeln!(file.lock(), "{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_record(timestamp: &str, record: &Record) -> String {
    format!(
        "[{}] [{:<5}] [{}] {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

/// Resolve the effective level from the CLI flag and the `RUST_LOG` value.
///
/// `RUST_LOG` is only honoured when it is a bare level name; per-module
/// directives fall back to the default.
pub fn resolve_level(flag: Option<LogLevel>, rust_log: Option<&str>) -> LevelFilter {
    flag.or_else(|| rust_log.and_then(LogLevel::parse))
        .unwrap_or_default()
        .to_level_filter()
}

/// Install the log bridge as the global logger.
///
/// Only the first call takes effect. A log file that cannot be opened is
/// reported on stderr and logging continues to stderr alone.
pub fn init_log_bridge(flag: Option<LogLevel>, log_file: Option<&Path>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(flag, rust_log.as_deref());

    let bridge = BRIDGE.get_or_init(|| {
        let file = log_file.and_then(|path| {
            match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(path)
            {
                Ok(file) => Some(Mutex::new(file)),
                Err(e) => {
                    eprintln!("msdf-text: cannot open log file {}: {}", path.display(), e);
                    None
                }
            }
        });
        LogBridge { level, file }
    });

    if log::set_logger(bridge).is_ok() {
        log::set_max_level(bridge.level);
    }
}
