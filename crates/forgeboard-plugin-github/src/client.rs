//! REST client for the GitHub Actions surface behind the portal proxy.

use std::sync::{
    Arc,
    LazyLock,
};

use forgeboard_plugin_api::{
    Branch,
    DetectionPolicy,
    Discovery,
    DispatchParameter,
    LatestRun,
    PluginError,
    PluginResult,
};
use futures::future::try_join_all;
use regex::Regex;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::mapper;
use crate::params;
use crate::types::{
    Ack,
    ContentFile,
    DispatchRequest,
    RunsPage,
    Workflow,
    WorkflowOverview,
    WorkflowRun,
    WorkflowsPage,
};

/// Last path segment of a definition file, e.g. `build.yaml`.
static FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w\d\-.]+$").expect("file name pattern"));

/// Run lifecycle states that still accept a cancel request.
const CANCELLABLE: [&str; 5] = ["in_progress", "queued", "requested", "waiting", "pending"];

pub struct WorkflowsClient {
    http: reqwest::Client,
    discovery: Arc<dyn Discovery>,
    proxy_path: String,
    detection: DetectionPolicy,
}

impl WorkflowsClient {
    pub fn new(
        http: reqwest::Client, discovery: Arc<dyn Discovery>, proxy_path: impl Into<String>,
    ) -> Self {
        Self {
            http,
            discovery,
            proxy_path: proxy_path.into(),
            detection: DetectionPolicy::default(),
        }
    }

    pub fn with_detection(mut self, detection: DetectionPolicy) -> Self {
        self.detection = detection;
        self
    }

    /// Proxy base for one repository, re-resolved on every call.
    async fn api_url(&self, repo_slug: &str) -> PluginResult<String> {
        let base = self.discovery.base_url("proxy").await?;
        Ok(format!(
            "{}{}/{}",
            base.trim_end_matches('/'),
            self.proxy_path,
            repo_slug
        ))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, repo_slug: &str) -> PluginResult<T> {
        self.request(Method::GET, path, repo_slug, None).await
    }

    async fn post<T: DeserializeOwned>(
        &self, path: &str, repo_slug: &str, body: Option<serde_json::Value>,
    ) -> PluginResult<T> {
        self.request(Method::POST, path, repo_slug, body).await
    }

    async fn request<T: DeserializeOwned>(
        &self, method: Method, path: &str, repo_slug: &str, body: Option<serde_json::Value>,
    ) -> PluginResult<T> {
        let url = format!("{}{}", self.api_url(repo_slug).await?, path);

        let mut request = self.http.request(method, &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PluginError::Network(format!("request to {path} failed: {e}")))?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> PluginResult<T> {
        let status = response.status();

        if status == reqwest::StatusCode::NO_CONTENT {
            // No body exists; synthesize an acknowledgment.
            return Ok(serde_json::from_value(serde_json::json!({ "ok": true }))?);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PluginError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PluginError::Decode(format!("unexpected response body: {e}")))
    }

    /// All workflow definitions, optionally narrowed to a set of
    /// definition-file basenames (e.g. `["build.yaml"]`). Provider order is
    /// preserved.
    pub async fn list_workflows(
        &self, repo_slug: &str, filter: Option<&[String]>,
    ) -> PluginResult<Vec<Workflow>> {
        let page: WorkflowsPage = self.get("/actions/workflows", repo_slug).await?;
        Ok(filter_workflows(page.workflows, filter))
    }

    pub async fn list_runs(&self, workflow_id: i64, repo_slug: &str) -> PluginResult<RunsPage> {
        self.get(&format!("/actions/workflows/{workflow_id}/runs"), repo_slug)
            .await
    }

    /// Newest run of a workflow, if any. The provider orders newest-first.
    pub async fn latest_run(
        &self, workflow_id: i64, repo_slug: &str,
    ) -> PluginResult<Option<WorkflowRun>> {
        let page = self.list_runs(workflow_id, repo_slug).await?;
        Ok(page.workflow_runs.into_iter().next())
    }

    pub async fn get_run(&self, run_id: i64, repo_slug: &str) -> PluginResult<WorkflowRun> {
        self.get(&format!("/actions/runs/{run_id}"), repo_slug).await
    }

    pub async fn list_branches(&self, repo_slug: &str) -> PluginResult<Vec<Branch>> {
        self.get("/branches", repo_slug).await
    }

    /// Raw definition file at `path`, decoded from the provider's base64.
    /// An empty `branch` leaves the provider on its default branch.
    pub async fn file_content(
        &self, repo_slug: &str, path: &str, branch: &str,
    ) -> PluginResult<String> {
        let mut url = format!("/contents/{path}");
        if !branch.is_empty() {
            url.push_str(&format!("?ref={}", urlencoding::encode(branch)));
        }
        let file: ContentFile = self.get(&url, repo_slug).await?;
        params::decode_content(&file.content)
    }

    /// Dispatch inputs declared by the workflow definition at `path`.
    pub async fn list_dispatch_parameters(
        &self, repo_slug: &str, path: &str, branch: &str,
    ) -> PluginResult<Vec<DispatchParameter>> {
        let source = self.file_content(repo_slug, path, branch).await?;
        params::extract_parameters(&source)
    }

    /// Triggers a run and waits for it to materialize.
    ///
    /// The dispatch endpoint returns 204 with no run id, so the new run is
    /// detected by polling the run count against a baseline snapshot taken
    /// before the dispatch. Two concurrent dispatches against one workflow
    /// can each claim the other's run; callers needing exact attribution
    /// must serialize dispatches per workflow.
    pub async fn start_run(
        &self, workflow_id: i64, repo_slug: &str, branch: &str,
        inputs: Option<serde_json::Value>, cancel: &CancellationToken,
    ) -> PluginResult<WorkflowRun> {
        let baseline = self.list_runs(workflow_id, repo_slug).await?.total_count;

        let body = serde_json::to_value(DispatchRequest {
            ref_name: branch,
            inputs: inputs.as_ref(),
        })?;
        let _ack: Ack = self
            .post(
                &format!("/actions/workflows/{workflow_id}/dispatches"),
                repo_slug,
                Some(body),
            )
            .await?;
        debug!(workflow_id, baseline, "dispatch accepted, waiting for the run to appear");

        self.detection
            .detect(cancel, || async move {
                let page = self.list_runs(workflow_id, repo_slug).await?;
                if page.total_count > baseline {
                    Ok(page.workflow_runs.into_iter().next())
                } else {
                    Ok(None)
                }
            })
            .await
    }

    /// Cancels a run, refusing with `Precondition` (and no cancel call)
    /// unless the run is still in a cancellable state.
    pub async fn cancel_run(
        &self, run_id: i64, repo_slug: &str,
    ) -> PluginResult<serde_json::Value> {
        let run = self.get_run(run_id, repo_slug).await?;

        if !CANCELLABLE.contains(&run.status.as_str()) {
            return Err(PluginError::Precondition(format!(
                "run {run_id} is not in progress (status: {})",
                run.status
            )));
        }

        self.post(&format!("/actions/runs/{run_id}/cancel"), repo_slug, None)
            .await
    }

    /// Combined catalog view: each workflow with its newest run and dispatch
    /// parameters, fetched concurrently per workflow.
    pub async fn list_workflows_response(
        &self, repo_slug: &str, branch: &str, filter: Option<&[String]>,
    ) -> PluginResult<Vec<WorkflowOverview>> {
        let workflows = self.list_workflows(repo_slug, filter).await?;

        try_join_all(workflows.into_iter().map(|workflow| async move {
            let (latest, parameters) = tokio::try_join!(
                self.latest_run(workflow.id, repo_slug),
                self.list_dispatch_parameters(repo_slug, &workflow.path, branch),
            )?;

            let latest_run = match latest {
                Some(run) => LatestRun::Run(mapper::snapshot(&run)),
                None => LatestRun::NoRunsYet,
            };

            Ok::<_, PluginError>(WorkflowOverview {
                workflow,
                latest_run,
                parameters,
            })
        }))
        .await
    }
}

/// Retains workflows whose definition-file basename appears in `filter`;
/// an empty or absent filter keeps everything.
fn filter_workflows(workflows: Vec<Workflow>, filter: Option<&[String]>) -> Vec<Workflow> {
    let filter = match filter {
        Some(filter) if !filter.is_empty() => filter,
        _ => return workflows,
    };

    workflows
        .into_iter()
        .filter(|workflow| {
            file_name(&workflow.path).is_some_and(|name| filter.iter().any(|f| f == name))
        })
        .collect()
}

fn file_name(path: &str) -> Option<&str> {
    FILE_NAME.find(path).map(|m| m.as_str())
}

/// Error payloads are usually JSON with a `message` field; anything else
/// falls back to the raw text, or a fixed marker when even that is empty.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "unparseable error body".to_string()
    } else {
        trimmed.to_string()
    }
}
