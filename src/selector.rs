use regex::Regex;

use crate::error::FeedError;
use crate::types::Source;

/// Matches pods generated by a deployment: `<deployment>-<replicaset hash>-<pod suffix>`.
///
/// Only the start is anchored, so names carrying extra trailing text after the
/// generated suffix still match.
#[derive(Debug, Clone)]
pub struct SelectionPattern {
    deployment: String,
    regex: Regex,
}

impl SelectionPattern {
    /// The deployment name is spliced into the expression verbatim; a name that
    /// does not compile is rejected here, before anything is streamed.
    pub fn for_deployment(deployment: &str) -> Result<Self, FeedError> {
        let regex = Regex::new(&format!("^{}-[0-9a-f]+-[0-9a-z]+", deployment)).map_err(
            |source| FeedError::InvalidPattern {
                deployment: deployment.to_string(),
                source,
            },
        )?;
        Ok(Self {
            deployment: deployment.to_string(),
            regex,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Keep the sources belonging to the deployment, in discovery order.
    pub fn select(&self, sources: Vec<Source>) -> Vec<Source> {
        sources
            .into_iter()
            .filter(|s| self.matches(&s.name))
            .collect()
    }
}
