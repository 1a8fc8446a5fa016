use std::sync::{Arc, Mutex};

use launchdeck::exec::{OutputLine, OutputSink, StreamKind};

/// A sink that:
/// - records every emitted line in arrival order
/// - can be cloned, so the test keeps a handle while the supervisor owns one.
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<OutputLine>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, in the order they were emitted.
    pub fn lines(&self) -> Vec<OutputLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Texts of the lines from one stream, in emission order.
    pub fn texts(&self, stream: StreamKind) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.stream() == stream)
            .map(|l| l.text().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputSink for RecordingSink {
    fn emit(&self, line: OutputLine) {
        let mut guard = self.lines.lock().unwrap();
        guard.push(line);
    }
}
