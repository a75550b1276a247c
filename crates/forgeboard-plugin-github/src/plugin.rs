//! GitHub Actions plugin implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use forgeboard_plugin_api::*;
use tokio_util::sync::CancellationToken;

use crate::{
    client,
    config,
    mapper,
    metadata,
};

/// GitHub Actions plugin for monitoring, triggering and cancelling
/// workflow runs through the portal proxy.
pub struct GitHubWorkflowsPlugin {
    metadata: PluginMetadata,
    client: Option<client::WorkflowsClient>,
    config: HashMap<String, String>,
}

impl Default for GitHubWorkflowsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubWorkflowsPlugin {
    pub fn new() -> Self {
        Self {
            metadata: metadata::create_metadata(),
            client: None,
            config: HashMap::new(),
        }
    }

    fn client(&self) -> PluginResult<&client::WorkflowsClient> {
        self.client
            .as_ref()
            .ok_or_else(|| PluginError::Internal("plugin not initialized".to_string()))
    }
}

#[async_trait]
impl Plugin for GitHubWorkflowsPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn initialize(
        &mut self, discovery: Arc<dyn Discovery>, config: HashMap<String, String>,
    ) -> PluginResult<()> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PluginError::Internal(format!("failed to build http client: {e}")))?;

        let proxy_path = config::proxy_path(&config);
        self.client = Some(client::WorkflowsClient::new(http, discovery, proxy_path));
        self.config = config;

        Ok(())
    }

    async fn list_pipelines(
        &self, repo_slug: &str, branch: &str, filter: Option<&[String]>,
    ) -> PluginResult<Vec<Pipeline>> {
        let client = self.client()?;

        let configured = config::workflow_files(&self.config);
        let filter = filter.map(<[String]>::to_vec).or(configured);

        let overviews = client
            .list_workflows_response(repo_slug, branch, filter.as_deref())
            .await?;

        Ok(overviews
            .into_iter()
            .map(|overview| Pipeline {
                id: config::pipeline_id(repo_slug, overview.workflow.id),
                provider_type: "github".to_string(),
                name: overview.workflow.name,
                web_url: Some(overview.workflow.html_url),
                latest_run: overview.latest_run,
                parameters: overview.parameters,
            })
            .collect())
    }

    async fn list_branches(&self, repo_slug: &str) -> PluginResult<Vec<Branch>> {
        self.client()?.list_branches(repo_slug).await
    }

    async fn trigger(
        &self, repo_slug: &str, params: TriggerParams, cancel: &CancellationToken,
    ) -> PluginResult<RunSnapshot> {
        let client = self.client()?;
        let workflow_id = config::parse_pipeline_id(&params.pipeline_id)?;

        let run = client
            .start_run(workflow_id, repo_slug, &params.ref_name, params.inputs, cancel)
            .await?;

        Ok(mapper::snapshot(&run))
    }

    async fn cancel_run(&self, repo_slug: &str, run_id: i64) -> PluginResult<serde_json::Value> {
        self.client()?.cancel_run(run_id, repo_slug).await
    }
}
