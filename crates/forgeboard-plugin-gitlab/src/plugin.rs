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
    types,
};

pub struct GitLabPipelinesPlugin {
    metadata: PluginMetadata,
    client: Option<client::PipelinesClient>,
    config: HashMap<String, String>,
}

impl Default for GitLabPipelinesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl GitLabPipelinesPlugin {
    pub fn new() -> Self {
        Self {
            metadata: metadata::create_metadata(),
            client: None,
            config: HashMap::new(),
        }
    }

    fn client(&self) -> PluginResult<&client::PipelinesClient> {
        self.client
            .as_ref()
            .ok_or_else(|| PluginError::Internal("plugin not initialized".to_string()))
    }

    /// Re-runs an existing pipeline. Provider-specific; not part of the
    /// shared plugin contract.
    pub async fn retry_run(&self, repo_slug: &str, pipeline_id: i64) -> PluginResult<RunSnapshot> {
        let pipeline = self.client()?.retry_pipeline(repo_slug, pipeline_id).await?;
        Ok(mapper::snapshot(&pipeline))
    }

    fn ref_parameter(&self, default: &str) -> DispatchParameter {
        DispatchParameter {
            name: "ref".to_string(),
            description: "Branch, tag, or commit SHA to run the pipeline on".to_string(),
            default: default.to_string(),
            required: true,
            kind: ParameterKind::String,
        }
    }
}

#[async_trait]
impl Plugin for GitLabPipelinesPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn provider_type(&self) -> &str {
        "gitlab"
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
        self.client = Some(client::PipelinesClient::new(http, discovery, proxy_path));
        self.config = config;

        Ok(())
    }

    /// One catalog row: the project's latest pipeline on the given branch
    /// (or any branch when unspecified). GitLab has no per-file pipeline
    /// definitions, so the basename filter does not apply.
    async fn list_pipelines(
        &self, repo_slug: &str, branch: &str, _filter: Option<&[String]>,
    ) -> PluginResult<Vec<Pipeline>> {
        let client = self.client()?;

        let ref_name = (!branch.is_empty()).then_some(branch);
        let latest = client.latest_pipeline(repo_slug, ref_name).await?;

        let default_ref = if branch.is_empty() {
            config::default_ref(&self.config)
        } else {
            branch.to_string()
        };

        let (pipeline_id, web_url, latest_run) = match latest {
            Some(pipeline) => (
                config::pipeline_id(repo_slug, pipeline.id),
                Some(pipeline.web_url.clone()),
                LatestRun::Run(mapper::snapshot(&pipeline)),
            ),
            None => (
                config::pipeline_id(repo_slug, 0),
                None,
                LatestRun::NoRunsYet,
            ),
        };

        Ok(vec![Pipeline {
            id: pipeline_id,
            provider_type: "gitlab".to_string(),
            name: repo_slug.to_string(),
            web_url,
            latest_run,
            parameters: vec![self.ref_parameter(&default_ref)],
        }])
    }

    async fn list_branches(&self, repo_slug: &str) -> PluginResult<Vec<Branch>> {
        self.client()?.list_branches(repo_slug).await
    }

    /// The provider returns the created pipeline synchronously, so the
    /// cancellation token has nothing to interrupt here.
    async fn trigger(
        &self, repo_slug: &str, params: TriggerParams, _cancel: &CancellationToken,
    ) -> PluginResult<RunSnapshot> {
        let client = self.client()?;

        let ref_name = if params.ref_name.is_empty() {
            config::default_ref(&self.config)
        } else {
            params.ref_name.clone()
        };

        let variables = params.inputs.as_ref().and_then(|inputs| {
            inputs.get("variables").and_then(|vars| {
                vars.as_object().map(|obj| {
                    obj.iter()
                        .map(|(key, value)| types::PipelineVariable {
                            key: key.clone(),
                            value: value.as_str().unwrap_or_default().to_string(),
                            variable_type: Some("env_var".to_string()),
                        })
                        .collect()
                })
            })
        });

        let pipeline = client
            .trigger_pipeline(repo_slug, &ref_name, variables)
            .await?;

        Ok(mapper::snapshot(&pipeline))
    }

    async fn cancel_run(&self, repo_slug: &str, run_id: i64) -> PluginResult<serde_json::Value> {
        self.client()?.cancel_pipeline(repo_slug, run_id).await
    }
}
