mod cli;
mod coordinator;
mod error;
mod kubernetes;
mod output;
mod reassembler;
mod selector;
mod streamer;
#[cfg(test)]
mod tests;
mod types;

use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cli::Cli;
use coordinator::AggregationRun;
use kubernetes::ClusterContext;
use output::OutputSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so they never mix with the log feed on stdout
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cluster = ClusterContext::connect(cli.context.as_deref(), cli.namespace.as_deref())
        .await
        .context("Could not connect to the Kubernetes cluster")?;
    let pods = Arc::new(cluster.pods());

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping log streams");
            ctrl_c.cancel();
        }
    });

    let stdout = std::io::stdout();
    let color = cli.color.enabled(stdout.is_terminal());
    let sink = OutputSink::new(stdout, color);

    let run = AggregationRun::new(pods.clone(), pods, cli.stream_request(), cancel);
    let summary = run
        .run(&cli.deployment, sink)
        .await
        .with_context(|| {
            format!(
                "Could not stream logs for deployment {} in namespace {}",
                cli.deployment, cluster.namespace
            )
        })?;

    debug!(
        "[{}] {} of {} streams finished, {} failed",
        cluster.context, summary.finished, summary.matched, summary.failed
    );
    Ok(())
}
