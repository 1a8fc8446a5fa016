// src/exec/pump.rs

//! Draining one output pipe of a running job.

use std::future::{self, Future};
use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use super::{OutputHistory, OutputLine, OutputSink, StreamKind};

/// Read `reader` to end-of-stream, emitting one [`OutputLine`] per line.
///
/// - A line ends at `\n`, `\r` or `\r\n`, or at EOF when unterminated data
///   is left over. A bare `\r` counts so that progress bars redrawn in
///   place show up as they are drawn.
/// - Invalid UTF-8 is replaced, never fatal.
/// - Every line goes to `sink` first and then into the returned history.
/// - A read error stops the pump; whatever was collected so far is
///   returned. The caller treats that like a normal end of stream.
///
/// Awaiting the read only parks this pump's task, never the other stream.
pub async fn pump<R, S>(
    reader: R,
    stream: StreamKind,
    sink: Arc<S>,
    history_cap: usize,
) -> OutputHistory
where
    R: AsyncRead + Unpin,
    S: OutputSink + ?Sized,
{
    pump_until(reader, stream, sink, history_cap, future::pending()).await
}

/// Like [`pump`], but gives up on the stream once `detach` completes.
///
/// A partial line buffered at that point is still emitted. The reader is
/// dropped, so a process still holding the write end sees a closed pipe.
pub async fn pump_until<R, S, F>(
    reader: R,
    stream: StreamKind,
    sink: Arc<S>,
    history_cap: usize,
    detach: F,
) -> OutputHistory
where
    R: AsyncRead + Unpin,
    S: OutputSink + ?Sized,
    F: Future<Output = ()>,
{
    let mut reader = BufReader::new(reader);
    let mut history = OutputHistory::new(history_cap);
    let mut buf = Vec::new();
    let mut skip_lf = false;
    let mut sequence: u64 = 0;
    tokio::pin!(detach);

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            () = &mut detach => {
                warn!(%stream, lines = sequence, "stream still open; detaching output pump");
                break;
            }
            read = next_line(&mut reader, &mut buf, &mut skip_lf) => read,
        };

        match read {
            Ok(false) => break,
            Ok(true) => {
                let line = OutputLine::new(stream, decode_line(&buf), sequence);
                sequence += 1;
                sink.emit(line.clone());
                history.push(line);
            }
            Err(e) => {
                warn!(%stream, error = %e, lines = sequence, "read error; stopping output pump");
                break;
            }
        }
    }

    if !buf.is_empty() {
        let line = OutputLine::new(stream, decode_line(&buf), sequence);
        sequence += 1;
        sink.emit(line.clone());
        history.push(line);
    }

    debug!(%stream, lines = sequence, "output pump reached end of stream");
    history
}

/// Fill `buf` with the next line, terminator excluded.
///
/// Returns `Ok(false)` at end of stream with nothing left to emit.
/// `skip_lf` carries a just-consumed `\r` over to the next call so the `\n`
/// of a `\r\n` pair does not produce an extra empty line.
async fn next_line<R>(reader: &mut R, buf: &mut Vec<u8>, skip_lf: &mut bool) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(!buf.is_empty());
        }

        if std::mem::take(skip_lf) && available[0] == b'\n' {
            reader.consume(1);
            continue;
        }

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                buf.extend_from_slice(&available[..end]);
                *skip_lf = available[end] == b'\r';
                reader.consume(end + 1);
                return Ok(true);
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
