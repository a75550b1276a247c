use std::sync::Arc;

use forgeboard_plugin_api::{
    Branch,
    Discovery,
    PluginError,
    PluginResult,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::mapper;
use crate::types::{
    Pipeline,
    PipelineVariable,
    RepoBranch,
    TriggerPipelineRequest,
};

/// Pipeline states that still accept a cancel request.
const CANCELLABLE: [&str; 5] = [
    "created",
    "waiting_for_resource",
    "preparing",
    "pending",
    "running",
];

pub struct PipelinesClient {
    http: reqwest::Client,
    discovery: Arc<dyn Discovery>,
    proxy_path: String,
}

impl PipelinesClient {
    pub fn new(
        http: reqwest::Client, discovery: Arc<dyn Discovery>, proxy_path: impl Into<String>,
    ) -> Self {
        Self {
            http,
            discovery,
            proxy_path: proxy_path.into(),
        }
    }

    /// Proxy base for one project; the slug is URL-encoded the way the
    /// provider addresses projects by path.
    async fn api_url(&self, repo_slug: &str) -> PluginResult<String> {
        let base = self.discovery.base_url("proxy").await?;
        Ok(format!(
            "{}{}/projects/{}",
            base.trim_end_matches('/'),
            self.proxy_path,
            urlencoding::encode(repo_slug)
        ))
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

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
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

    async fn get<T: DeserializeOwned>(&self, path: &str, repo_slug: &str) -> PluginResult<T> {
        self.request(Method::GET, path, repo_slug, None).await
    }

    /// Recent pipelines, newest first, optionally scoped to one ref.
    pub async fn list_pipelines(
        &self, repo_slug: &str, ref_name: Option<&str>, per_page: usize,
    ) -> PluginResult<Vec<Pipeline>> {
        let mut path = format!("/pipelines?per_page={per_page}");
        if let Some(ref_name) = ref_name.filter(|r| !r.is_empty()) {
            path.push_str(&format!("&ref={}", urlencoding::encode(ref_name)));
        }
        self.get(&path, repo_slug).await
    }

    pub async fn latest_pipeline(
        &self, repo_slug: &str, ref_name: Option<&str>,
    ) -> PluginResult<Option<Pipeline>> {
        let pipelines = self.list_pipelines(repo_slug, ref_name, 1).await?;
        Ok(pipelines.into_iter().next())
    }

    pub async fn get_pipeline(&self, repo_slug: &str, pipeline_id: i64) -> PluginResult<Pipeline> {
        self.get(&format!("/pipelines/{pipeline_id}"), repo_slug).await
    }

    /// Creates a pipeline for `ref_name`. Unlike the fire-and-forget
    /// dispatch endpoints elsewhere, the provider returns the created
    /// pipeline synchronously, so no detection polling is needed.
    pub async fn trigger_pipeline(
        &self, repo_slug: &str, ref_name: &str, variables: Option<Vec<PipelineVariable>>,
    ) -> PluginResult<Pipeline> {
        let body = serde_json::to_value(TriggerPipelineRequest {
            ref_name,
            variables,
        })?;
        debug!(repo_slug, ref_name, "triggering pipeline");
        self.request(Method::POST, "/pipeline", repo_slug, Some(body))
            .await
    }

    pub async fn retry_pipeline(
        &self, repo_slug: &str, pipeline_id: i64,
    ) -> PluginResult<Pipeline> {
        self.request(
            Method::POST,
            &format!("/pipelines/{pipeline_id}/retry"),
            repo_slug,
            None,
        )
        .await
    }

    /// Cancels a pipeline, refusing with `Precondition` (and no cancel
    /// call) unless it is still in a cancellable state.
    pub async fn cancel_pipeline(
        &self, repo_slug: &str, pipeline_id: i64,
    ) -> PluginResult<serde_json::Value> {
        let pipeline = self.get_pipeline(repo_slug, pipeline_id).await?;

        if !CANCELLABLE.contains(&pipeline.status.as_str()) {
            return Err(PluginError::Precondition(format!(
                "pipeline {pipeline_id} is not in progress (status: {})",
                pipeline.status
            )));
        }

        self.request(
            Method::POST,
            &format!("/pipelines/{pipeline_id}/cancel"),
            repo_slug,
            None,
        )
        .await
    }

    pub async fn list_branches(&self, repo_slug: &str) -> PluginResult<Vec<Branch>> {
        let branches: Vec<RepoBranch> = self.get("/repository/branches", repo_slug).await?;
        Ok(branches.into_iter().map(mapper::map_branch).collect())
    }
}

fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        // GitLab reports either `message` or `error`.
        for key in ["message", "error"] {
            if let Some(message) = value.get(key) {
                if let Some(text) = message.as_str() {
                    return text.to_string();
                }
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "unparseable error body".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_variants() {
        assert_eq!(error_message(r#"{"message":"404 Not Found"}"#), "404 Not Found");
        assert_eq!(error_message(r#"{"error":"insufficient_scope"}"#), "insufficient_scope");
        assert_eq!(
            error_message(r#"{"message":{"base":["ref is ambiguous"]}}"#),
            r#"{"base":["ref is ambiguous"]}"#
        );
        assert_eq!(error_message(""), "unparseable error body");
    }
}
