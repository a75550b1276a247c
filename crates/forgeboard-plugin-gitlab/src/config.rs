use std::collections::HashMap;

pub(crate) const DEFAULT_PROXY_PATH: &str = "/gitlab/api";

pub(crate) fn proxy_path(config: &HashMap<String, String>) -> String {
    config
        .get("proxy_path")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| format!("/{}", p.trim_matches('/')))
        .unwrap_or_else(|| DEFAULT_PROXY_PATH.to_string())
}

/// Ref used when a trigger request does not name one.
pub(crate) fn default_ref(config: &HashMap<String, String>) -> String {
    config
        .get("default_ref")
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .unwrap_or("main")
        .to_string()
}

pub(crate) fn pipeline_id(repo_slug: &str, pipeline: i64) -> String {
    format!("gitlab__{repo_slug}__{pipeline}")
}
