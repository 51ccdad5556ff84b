use crate::error::FeedError;
use crate::kubernetes::{LogStreamProvider, SourceDirectory};
use crate::output::OutputSink;
use crate::selector::SelectionPattern;
use crate::streamer::stream_source;
use crate::types::{LogLine, RunSummary, Source, StreamRequest};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Lines buffered between the streamers and the output writer.
const LINE_CHANNEL_CAPACITY: usize = 1024;

/// One fan-out-and-merge pass over a deployment's pods.
pub struct AggregationRun {
    directory: Arc<dyn SourceDirectory>,
    provider: Arc<dyn LogStreamProvider>,
    request: StreamRequest,
    cancel: CancellationToken,
}

impl AggregationRun {
    pub fn new(
        directory: Arc<dyn SourceDirectory>,
        provider: Arc<dyn LogStreamProvider>,
        request: StreamRequest,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            directory,
            provider,
            request,
            cancel,
        }
    }

    /// Discover the deployment's pods and stream all of them into `sink`.
    ///
    /// Fails only on setup (bad deployment name, pod listing) or when the sink
    /// itself can no longer be written. Individual pod failures are reported in
    /// the summary.
    pub async fn run<W>(
        &self,
        deployment: &str,
        sink: OutputSink<W>,
    ) -> Result<RunSummary, FeedError>
    where
        W: Write + Send + 'static,
    {
        let pattern = SelectionPattern::for_deployment(deployment)?;
        let sources = self.directory.list_sources().await?;
        let selected = pattern.select(sources);

        if selected.is_empty() {
            info!("No pods found for deployment {}", pattern.deployment());
        } else {
            info!(
                "Streaming logs from {} pod(s) of deployment {}",
                selected.len(),
                pattern.deployment()
            );
        }

        self.aggregate(selected, sink).await
    }

    /// Stream the given sources and return once every streamer has finished
    /// and the sink has written everything it received.
    pub async fn aggregate<W>(
        &self,
        sources: Vec<Source>,
        sink: OutputSink<W>,
    ) -> Result<RunSummary, FeedError>
    where
        W: Write + Send + 'static,
    {
        if sources.is_empty() {
            return Ok(RunSummary::default());
        }

        let run_cancel = self.cancel.child_token();
        let (tx, rx) = mpsc::channel::<LogLine>(LINE_CHANNEL_CAPACITY);

        let writer_cancel = run_cancel.clone();
        let writer = tokio::spawn(async move {
            let result = sink.drain(rx).await;
            if result.is_err() {
                writer_cancel.cancel();
            }
            result
        });

        let summary = self.fan_out(sources, tx, &run_cancel).await;

        writer
            .await
            .map_err(|e| FeedError::Output(std::io::Error::other(e)))??;
        Ok(summary)
    }

    async fn fan_out(
        &self,
        sources: Vec<Source>,
        tx: mpsc::Sender<LogLine>,
        cancel: &CancellationToken,
    ) -> RunSummary {
        let params = self.request.to_log_params();
        let mut tasks = JoinSet::new();

        for source in sources {
            let provider = Arc::clone(&self.provider);
            let params = params.clone();
            let tx = tx.clone();
            let cancel = cancel.clone();

            debug!(
                "Starting stream for pod {} (containers: {})",
                source.name,
                source.containers.join(",")
            );
            tasks.spawn(async move {
                let outcome =
                    stream_source(provider.as_ref(), &source.name, &params, &tx, &cancel).await;
                (source.name, outcome)
            });
        }
        // Only the streamers hold senders now; the writer stops once they are all done.
        drop(tx);

        let mut summary = RunSummary {
            matched: tasks.len(),
            ..Default::default()
        };

        while let Some(joined) = tasks.join_next().await {
            summary.finished += 1;
            match joined {
                Ok((pod, outcome)) => {
                    if outcome.is_failure() {
                        summary.failed += 1;
                    }
                    debug!(
                        "Stream for pod {} finished ({:?}), {} outstanding",
                        pod,
                        outcome,
                        tasks.len()
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("Log stream task failed: {}", e);
                }
            }
        }

        summary
    }
}
