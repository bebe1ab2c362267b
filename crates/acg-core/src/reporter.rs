//! Reporting capability passed into the core passes.
//!
//! Extraction and validation report non-fatal findings (skipped operations,
//! progress) through a [`Reporter`] handed to them, never through global state.

use std::sync::Mutex;

use log::Level;

pub trait Reporter {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Start a scoped progress indicator. It reports completion when
    /// [`Progress::finish`] is called, or failure if dropped unfinished.
    fn progress(&self, label: &str) -> Progress<'_>
    where
        Self: Sized,
    {
        Progress::start(self, label)
    }
}

/// Scoped progress indicator tied to a reporter.
pub struct Progress<'r> {
    reporter: &'r dyn Reporter,
    label: String,
    done: bool,
}

impl<'r> Progress<'r> {
    pub fn start(reporter: &'r dyn Reporter, label: &str) -> Self {
        reporter.debug(&format!("{label}..."));
        Self {
            reporter,
            label: label.to_string(),
            done: false,
        }
    }

    pub fn finish(mut self, summary: &str) {
        self.done = true;
        self.reporter.info(&format!("{}: {summary}", self.label));
    }
}

impl Drop for Progress<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.reporter.warn(&format!("{}: did not complete", self.label));
        }
    }
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "acg", level, "{message}");
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Keeps every message in memory. Used by tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::Warn)
    }
}

impl Reporter for CollectingReporter {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}
