use kube::config::{InferConfigError, KubeconfigError};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("failed to infer cluster configuration: {0}")]
    InferConfig(#[from] InferConfigError),

    #[error("failed to build Kubernetes client: {0}")]
    Client(#[source] kube::Error),

    #[error("failed to list pods in namespace {namespace}: {source}")]
    ListSources {
        namespace: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid deployment name {deployment:?}: {source}")]
    InvalidPattern {
        deployment: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to open log stream for pod {pod}: {source}")]
    OpenStream {
        pod: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write log output: {0}")]
    Output(#[from] std::io::Error),
}
