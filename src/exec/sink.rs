// src/exec/sink.rs

//! Live output consumers.
//!
//! Pumps hand every completed line to an [`OutputSink`]. The line is moved
//! into the sink, so observers only ever see immutable snapshots.

use tokio::sync::mpsc;

use super::OutputLine;

/// Receives output lines as they are produced.
///
/// `emit` is called from the pump tasks of both streams, possibly at the
/// same time, so implementations must be cheap and must not block for long:
/// a slow sink stalls the pump, and a stalled pump eventually stalls the
/// child on a full pipe.
pub trait OutputSink: Send + Sync + 'static {
    fn emit(&self, line: OutputLine);
}

/// Forward lines over a channel. A dropped receiver is not an error; the
/// pump keeps draining the pipe.
impl OutputSink for mpsc::UnboundedSender<OutputLine> {
    fn emit(&self, line: OutputLine) {
        let _ = self.send(line);
    }
}

/// Adapter turning a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> OutputSink for FnSink<F>
where
    F: Fn(OutputLine) + Send + Sync + 'static,
{
    fn emit(&self, line: OutputLine) {
        (self.0)(line)
    }
}

/// Sink that drops everything; used when only the histories matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&self, _line: OutputLine) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::exec::{StreamKind, pump};

    #[tokio::test]
    async fn closure_sink_sees_every_line() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let sink = Arc::new(FnSink(move |_line: OutputLine| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        pump(&b"a\nb\nc\n"[..], StreamKind::Stdout, sink, 2).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn null_sink_still_fills_history() {
        let history = pump(&b"a\nb\n"[..], StreamKind::Stderr, Arc::new(NullSink), 50).await;
        assert_eq!(history.texts(), vec!["a", "b"]);
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel::<OutputLine>();
        drop(rx);
        tx.emit(OutputLine::new(StreamKind::Stdout, "late", 0));
    }
}
