//! Configuration parsing for the GitHub Actions plugin

use std::collections::HashMap;

use forgeboard_plugin_api::{
    PluginError,
    PluginResult,
};

pub(crate) const DEFAULT_PROXY_PATH: &str = "/github/api";

/// Path of the proxy route fronting the GitHub API, normalized to a single
/// leading slash.
pub(crate) fn proxy_path(config: &HashMap<String, String>) -> String {
    config
        .get("proxy_path")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| format!("/{}", p.trim_matches('/')))
        .unwrap_or_else(|| DEFAULT_PROXY_PATH.to_string())
}

/// Comma-separated definition-file basenames to surface; `None` shows all.
pub(crate) fn workflow_files(config: &HashMap<String, String>) -> Option<Vec<String>> {
    let files: Vec<String> = config
        .get("workflow_files")?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if files.is_empty() {
        None
    } else {
        Some(files)
    }
}

/// Extracts the workflow id from a catalog pipeline id of the form
/// `github__{repo_slug}__{workflow_id}`.
pub(crate) fn parse_pipeline_id(id: &str) -> PluginResult<i64> {
    let parts: Vec<&str> = id.split("__").collect();

    if parts.len() != 3 || parts[0] != "github" {
        return Err(PluginError::InvalidConfig(format!(
            "invalid pipeline id format: {id}"
        )));
    }

    parts[2]
        .parse::<i64>()
        .map_err(|_| PluginError::InvalidConfig(format!("invalid workflow id in: {id}")))
}

pub(crate) fn pipeline_id(repo_slug: &str, workflow_id: i64) -> String {
    format!("github__{repo_slug}__{workflow_id}")
}
