//! Injectable diagnostics.
//!
//! Components never log to a global sink directly. They receive a
//! [`Diagnostics`] handle; the binary passes [`LogDiagnostics`], which
//! forwards to the `log` facade, and tests pass [`CapturedDiagnostics`].

use log::Level;
use std::sync::Mutex;

pub const LOG_TARGET: &str = "devdash";

pub trait Diagnostics: Send + Sync {
    fn record(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.record(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

/// Forwards to the `log` crate, whose backend (`env_logger`) is set up in `main`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn record(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Diagnostics for Silent {
    fn record(&self, _level: Level, _message: &str) {}
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct CapturedDiagnostics {
    entries: Mutex<Vec<(Level, String)>>,
}

impl CapturedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Diagnostics for CapturedDiagnostics {
    fn record(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}
