use chrono::{
    DateTime,
    Utc,
};
use forgeboard_plugin_api::{
    DispatchParameter,
    LatestRun,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A workflow definition as listed by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: i64,
    pub name: String,
    /// Provider lifecycle string, e.g. `active` or `disabled_manually`.
    pub state: String,
    /// Definition file location within the repository.
    pub path: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowsPage {
    pub total_count: i64,
    pub workflows: Vec<Workflow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
    pub status: String,
    /// Terminal outcome; only meaningful once `status` is `completed`.
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunsPage {
    pub total_count: i64,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// `GET /contents/{path}` payload; `content` is base64, wrapped in newlines
/// by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DispatchRequest<'a> {
    #[serde(rename = "ref")]
    pub ref_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<&'a serde_json::Value>,
}

/// Body synthesized for 204 responses, which carry none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// One combined catalog row: a workflow, its newest run, and the dispatch
/// inputs its definition declares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOverview {
    pub workflow: Workflow,
    pub latest_run: LatestRun,
    pub parameters: Vec<DispatchParameter>,
}
