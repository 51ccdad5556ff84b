use crate::output::ColorMode;
use crate::types::StreamRequest;
use clap::Parser;

#[derive(Parser)]
#[command(name = "kubectl-feed")]
#[command(about = "Stream logs from every pod of a deployment as one labeled feed")]
pub struct Cli {
    /// Deployment whose pods to stream
    pub deployment: String,

    /// Container name (if multi-container pod)
    #[arg(short = 'c', long)]
    pub container: Option<String>,

    /// Keep streaming new log lines as they are written
    #[arg(short = 'f', long)]
    pub follow: bool,

    /// Number of recent lines to show per pod (0 shows none)
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub tail: Option<i64>,

    /// Namespace (defaults to the context's namespace)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Context
    #[arg(long)]
    pub context: Option<String>,

    /// When to color pod labels
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn stream_request(&self) -> StreamRequest {
        StreamRequest {
            follow: self.follow,
            tail_lines: self.tail,
            container: self.container.clone(),
        }
    }
}
