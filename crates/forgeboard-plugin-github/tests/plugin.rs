//! Trait-level tests: the plugin surface the portal host sees.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use forgeboard_plugin_api::{
    LatestRun,
    Plugin,
    PluginError,
    PluginRegistry,
    StaticDiscovery,
    TriggerParams,
};
use forgeboard_plugin_github::GitHubWorkflowsPlugin;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{
    method,
    path,
};
use wiremock::{
    Mock,
    MockServer,
    ResponseTemplate,
};

const REPO: &str = "acme/widgets";

fn initialized(server: &MockServer) -> GitHubWorkflowsPlugin {
    let mut plugin = GitHubWorkflowsPlugin::new();
    plugin
        .initialize(
            Arc::new(StaticDiscovery::single(server.uri())),
            HashMap::new(),
        )
        .unwrap();
    plugin
}

#[tokio::test]
async fn test_metadata_and_registration() {
    let mut registry = PluginRegistry::new();
    forgeboard_plugin_github::register(&mut registry);

    assert!(registry.is_registered("github"));
    let plugin = registry.get("github").unwrap();
    assert_eq!(plugin.metadata().name, "GitHub Actions");
    assert!(plugin.metadata().capabilities.trigger);
    assert_eq!(
        plugin
            .metadata()
            .config_schema
            .field("proxy_path")
            .and_then(|f| f.default_value.as_deref()),
        Some("/github/api")
    );
}

#[tokio::test]
async fn test_operations_require_initialization() {
    let plugin = GitHubWorkflowsPlugin::new();
    let err = plugin.list_branches(REPO).await.unwrap_err();
    assert!(matches!(err, PluginError::Internal(_)));
}

#[tokio::test]
async fn test_trigger_rejects_foreign_pipeline_id() {
    let server = MockServer::start().await;
    let plugin = initialized(&server);

    let err = plugin
        .trigger(
            REPO,
            TriggerParams {
                pipeline_id: "gitlab__acme/widgets__7".to_string(),
                ref_name: "main".to_string(),
                inputs: None,
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PluginError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_list_pipelines_builds_catalog_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/github/api/{REPO}/actions/workflows")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "workflows": [{
                "id": 42,
                "name": "Build",
                "state": "active",
                "path": ".github/workflows/build.yaml",
                "html_url": format!("https://github.com/{REPO}/actions/workflows/42"),
                "created_at": "2023-05-01T10:00:00Z",
                "updated_at": "2023-06-01T10:00:00Z"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/github/api/{REPO}/actions/workflows/42/runs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "workflow_runs": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/github/api/{REPO}/contents/.github/workflows/build.yaml"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": BASE64.encode("on:\n  push: ~\n"),
            "encoding": "base64"
        })))
        .mount(&server)
        .await;

    let plugin = initialized(&server);
    let pipelines = plugin.list_pipelines(REPO, "", None).await.unwrap();

    assert_eq!(pipelines.len(), 1);
    let row = &pipelines[0];
    assert_eq!(row.id, format!("github__{REPO}__42"));
    assert_eq!(row.provider_type, "github");
    assert_eq!(row.name, "Build");
    assert_eq!(row.latest_run, LatestRun::NoRunsYet);
    assert!(row.parameters.is_empty());
}
