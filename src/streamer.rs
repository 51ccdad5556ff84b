use crate::kubernetes::LogStreamProvider;
use crate::reassembler::LineReassembler;
use crate::types::{LogLine, StreamOutcome};
use futures::io::AsyncReadExt;
use kube::api::LogParams;
use std::io::ErrorKind;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Bytes requested per read. Chunks carry no line alignment.
pub const CHUNK_SIZE: usize = 2000;

/// Stream one pod's logs into `tx` until the stream ends, fails, or `cancel` fires.
///
/// Errors are logged here and folded into the returned outcome; nothing is
/// propagated to the caller. The stream is dropped before returning on every path.
pub async fn stream_source(
    provider: &dyn LogStreamProvider,
    pod: &str,
    params: &LogParams,
    tx: &mpsc::Sender<LogLine>,
    cancel: &CancellationToken,
) -> StreamOutcome {
    let opened = tokio::select! {
        _ = cancel.cancelled() => return StreamOutcome::Cancelled,
        opened = provider.open_stream(pod, params) => opened,
    };

    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            warn!("{}", e);
            return StreamOutcome::OpenFailed;
        }
    };
    debug!("Opened log stream for pod {}", pod);

    let mut lines = LineReassembler::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];

    let outcome = 'read: loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => break StreamOutcome::Cancelled,
            read = stream.read(&mut chunk) => read,
        };

        match read {
            Ok(0) => break StreamOutcome::Ended,
            Ok(n) => {
                for text in lines.push(&chunk[..n]) {
                    let line = LogLine {
                        source: pod.to_string(),
                        text,
                    };
                    let sent = tokio::select! {
                        _ = cancel.cancelled() => break 'read StreamOutcome::Cancelled,
                        sent = tx.send(line) => sent,
                    };
                    if sent.is_err() {
                        debug!("Output closed, stopping stream for pod {}", pod);
                        break 'read StreamOutcome::Cancelled;
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Error reading logs from pod {}: {}", pod, e);
                break StreamOutcome::ReadFailed;
            }
        }
    };
    drop(stream);

    let dropped = lines.pending_len();
    if dropped > 0 {
        debug!(
            "Discarded {} unterminated bytes at end of stream for pod {}",
            dropped, pod
        );
    }
    outcome
}
