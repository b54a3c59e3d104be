//! Progress reporting for long-running project operations.

use log::{debug, info};

/// Receives progress notifications. Purely informational: nothing the
/// reporter does feeds back into the operation.
pub trait Progress {
    /// Begin a new operation at `init_value` percent.
    fn start(&mut self, title: &str, text: &str, init_value: f64);

    /// Jump to an absolute `value` percent.
    fn update(&mut self, value: f64);

    /// Advance by `quantum` percent.
    fn add(&mut self, quantum: f64);

    /// Finish the current operation.
    fn end(&mut self);
}

/// Progress reporter that writes to the log.
#[derive(Debug, Clone, Default)]
pub struct LogProgress {
    title: String,
    value: f64,
    running: bool,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current progress in percent.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Progress for LogProgress {
    fn start(&mut self, title: &str, text: &str, init_value: f64) {
        self.title = title.to_string();
        self.value = init_value.clamp(0.0, 100.0);
        self.running = true;
        info!("{}: {} [{:.0}%]", self.title, text, self.value);
    }

    fn update(&mut self, value: f64) {
        self.value = value.clamp(0.0, 100.0);
        debug!("{}: {:.0}%", self.title, self.value);
    }

    fn add(&mut self, quantum: f64) {
        self.update(self.value + quantum);
    }

    fn end(&mut self) {
        self.value = 100.0;
        self.running = false;
        debug!("{}: done", self.title);
    }
}

/// Progress reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn start(&mut self, _title: &str, _text: &str, _init_value: f64) {}

    fn update(&mut self, _value: f64) {}

    fn add(&mut self, _quantum: f64) {}

    fn end(&mut self) {}
}
