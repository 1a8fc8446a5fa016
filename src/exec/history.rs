// src/exec/history.rs

use std::collections::VecDeque;

use super::OutputLine;

/// Number of recent lines kept per stream unless configured otherwise.
pub const DEFAULT_HISTORY_LINES: usize = 50;

/// Bounded tail of one output stream.
///
/// Holds the most recent `cap` lines, oldest first. Older lines are
/// discarded, never persisted.
#[derive(Debug, Clone)]
pub struct OutputHistory {
    lines: VecDeque<OutputLine>,
    cap: usize,
    total: u64,
}

impl OutputHistory {
    /// A `cap` of 0 is treated as 1.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            lines: VecDeque::with_capacity(cap),
            cap,
            total: 0,
        }
    }

    pub fn push(&mut self, line: OutputLine) {
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        self.total += 1;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines seen over the lifetime of the stream, including evicted ones.
    pub fn total_lines(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(OutputLine::text).collect()
    }
}

impl Default for OutputHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::StreamKind;

    fn line(seq: u64) -> OutputLine {
        OutputLine::new(StreamKind::Stdout, format!("line{seq}"), seq)
    }

    #[test]
    fn keeps_only_most_recent_lines() {
        let mut history = OutputHistory::new(50);
        for seq in 0..60 {
            history.push(line(seq));
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.total_lines(), 60);
        assert_eq!(history.iter().next().map(OutputLine::sequence), Some(10));
        assert_eq!(history.iter().last().map(OutputLine::sequence), Some(59));
    }

    #[test]
    fn zero_cap_is_clamped() {
        let mut history = OutputHistory::new(0);
        history.push(line(0));
        history.push(line(1));
        assert_eq!(history.total_lines(), 2);
        assert_eq!(history.texts(), vec!["line1"]);
    }
}
