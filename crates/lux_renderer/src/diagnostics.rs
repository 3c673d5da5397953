//! Diagnostic sinks for recoverable problems found while rendering.
//!
//! Reporting is fire-and-forget: a sink never changes what gets rendered.

use std::sync::Mutex;

/// Receives free-text diagnostics from the renderer.
///
/// Shared by every render worker, so implementations must be thread-safe.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}
