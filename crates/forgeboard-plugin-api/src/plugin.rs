use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};
use tokio_util::sync::CancellationToken;

use crate::discovery::Discovery;
use crate::error::PluginResult;
use crate::schema::ConfigSchema;
use crate::types::{
    Branch,
    Pipeline,
    RunSnapshot,
    TriggerParams,
};

/// Plugin metadata - describes the plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin name (e.g., "GitHub Actions")
    pub name: String,
    /// Plugin identifier (e.g., "github")
    pub provider_type: String,
    pub version: String,
    pub description: String,
    /// Configuration schema for generic settings UI
    pub config_schema: ConfigSchema,
    pub capabilities: PluginCapabilities,
}

/// Plugin capabilities - what features the plugin supports
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PluginCapabilities {
    /// Supports listing pipelines/workflows with their latest run
    pub pipelines: bool,
    /// Supports listing repository branches
    pub branches: bool,
    /// Supports triggering runs
    pub trigger: bool,
    /// Supports cancelling in-flight runs
    pub cancel: bool,
    /// Derives dispatch parameters from the pipeline definition
    pub dispatch_parameters: bool,
}

/// Provider contract the portal calls into.
///
/// All operations are stateless between calls; the plugin holds only its
/// configuration and an HTTP client after `initialize`.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Get plugin metadata
    fn metadata(&self) -> &PluginMetadata;

    /// Initialize with the discovery capability and configuration
    fn initialize(
        &mut self, discovery: Arc<dyn Discovery>, config: HashMap<String, String>,
    ) -> PluginResult<()>;

    /// Combined catalog rows for one repository: each surviving
    /// workflow/pipeline with its latest run and dispatch parameters.
    ///
    /// `filter` narrows by definition-file basename where the provider has
    /// per-file definitions; providers without that notion ignore it.
    async fn list_pipelines(
        &self, repo_slug: &str, branch: &str, filter: Option<&[String]>,
    ) -> PluginResult<Vec<Pipeline>>;

    /// List branches of the repository
    async fn list_branches(&self, repo_slug: &str) -> PluginResult<Vec<Branch>>;

    /// Trigger a new run and resolve it to a concrete snapshot.
    ///
    /// `cancel` aborts any provider-side detection wait; it does not undo
    /// the dispatch itself.
    async fn trigger(
        &self, repo_slug: &str, params: TriggerParams, cancel: &CancellationToken,
    ) -> PluginResult<RunSnapshot>;

    /// Cancel a run that is still in a cancellable state.
    ///
    /// Returns the provider's acknowledgment payload unmodified.
    async fn cancel_run(&self, repo_slug: &str, run_id: i64) -> PluginResult<serde_json::Value>;

    /// Get the provider type string
    fn provider_type(&self) -> &str {
        &self.metadata().provider_type
    }
}
