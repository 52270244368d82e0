//! In-memory logger keyed by thread.
//!
//! Test binaries run many tests in parallel on separate threads; entries are
//! tagged with the emitting thread so each test only sees its own output.

use std::sync::{Mutex, OnceLock};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEntry {
    /// Severity of the entry.
    pub level: Level,
    /// Fully formatted message.
    pub message: String,
}

struct CaptureLogger {
    entries: Mutex<Vec<(ThreadId, CapturedEntry)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let entry = CapturedEntry {
            level: record.level(),
            message: record.args().to_string(),
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((thread::current().id(), entry));
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<CaptureLogger> = OnceLock::new();
static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs the capture logger as the global logger.
///
/// Returns `false` when a different logger was installed first; captured
/// entries will then always be empty. Repeated calls are cheap.
pub fn install() -> bool {
    *INSTALLED.get_or_init(|| {
        let logger = LOGGER.get_or_init(|| CaptureLogger {
            entries: Mutex::new(Vec::new()),
        });
        let installed = log::set_logger(logger).is_ok();
        if installed {
            log::set_max_level(LevelFilter::Trace);
        }
        installed
    })
}

/// Drains and returns every entry logged from the calling thread.
pub fn take_for_current_thread() -> Vec<CapturedEntry> {
    let Some(logger) = LOGGER.get() else {
        return Vec::new();
    };
    let current = thread::current().id();
    let Ok(mut entries) = logger.entries.lock() else {
        return Vec::new();
    };
    let (mine, rest): (Vec<_>, Vec<_>) = entries.drain(..).partition(|(id, _)| *id == current);
    *entries = rest;
    mine.into_iter().map(|(_, entry)| entry).collect()
}
