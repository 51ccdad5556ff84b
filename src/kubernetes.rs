use crate::error::FeedError;
use crate::types::Source;
use async_trait::async_trait;
use futures::io::AsyncRead;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, ResourceExt};
use std::pin::Pin;
use tracing::{debug, info};

/// Raw log bytes for one pod. Dropping it closes the underlying connection.
pub type ByteStream<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

/// Lists the pods a run can choose from.
#[async_trait]
pub trait SourceDirectory: Send + Sync {
    async fn list_sources(&self) -> Result<Vec<Source>, FeedError>;
}

/// Opens a log stream for a single pod.
#[async_trait]
pub trait LogStreamProvider: Send + Sync {
    async fn open_stream<'a>(
        &'a self,
        pod: &'a str,
        params: &'a LogParams,
    ) -> Result<ByteStream<'a>, FeedError>;
}

/// Cluster handle and namespace, resolved once at startup.
#[derive(Clone)]
pub struct ClusterContext {
    pub client: Client,
    pub context: String,
    pub namespace: String,
}

impl ClusterContext {
    pub async fn connect(
        context: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<Self, FeedError> {
        let config = match context {
            Some(ctx) => {
                Config::from_kubeconfig(&KubeConfigOptions {
                    context: Some(ctx.to_string()),
                    ..Default::default()
                })
                .await?
            }
            None => Config::infer().await?,
        };

        let context_name = match context {
            Some(ctx) => ctx.to_string(),
            None => Kubeconfig::read()
                .ok()
                .and_then(|k| k.current_context)
                .unwrap_or_else(|| "default".to_string()),
        };

        let namespace = namespace
            .map(str::to_string)
            .unwrap_or_else(|| config.default_namespace.clone());

        let client = Client::try_from(config).map_err(FeedError::Client)?;
        info!("Using context {} (namespace {})", context_name, namespace);

        Ok(Self {
            client,
            context: context_name,
            namespace,
        })
    }

    pub fn pods(&self) -> PodApi {
        PodApi::new(self.client.clone(), &self.namespace)
    }
}

/// Pod API scoped to one namespace; serves both listing and log streaming.
#[derive(Clone)]
pub struct PodApi {
    api: Api<Pod>,
    namespace: String,
}

impl PodApi {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

fn source_from_pod(pod: &Pod) -> Source {
    let containers = pod
        .spec
        .as_ref()
        .map(|spec| spec.containers.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default();
    Source {
        name: pod.name_any(),
        containers,
    }
}

#[async_trait]
impl SourceDirectory for PodApi {
    async fn list_sources(&self) -> Result<Vec<Source>, FeedError> {
        let pods = self
            .api
            .list(&ListParams::default())
            .await
            .map_err(|e| FeedError::ListSources {
                namespace: self.namespace.clone(),
                source: Box::new(e),
            })?;
        debug!("Found {} pods in namespace {}", pods.items.len(), self.namespace);
        Ok(pods.items.iter().map(source_from_pod).collect())
    }
}

#[async_trait]
impl LogStreamProvider for PodApi {
    async fn open_stream<'a>(
        &'a self,
        pod: &'a str,
        params: &'a LogParams,
    ) -> Result<ByteStream<'a>, FeedError> {
        let stream = self
            .api
            .log_stream(pod, params)
            .await
            .map_err(|e| FeedError::OpenStream {
                pod: pod.to_string(),
                source: Box::new(e),
            })?;
        Ok(Box::pin(stream))
    }
}
