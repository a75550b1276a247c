use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Unified run state across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Success,
    Failed,
    Running,
    Pending,
    Cancelled,
    Skipped,
}

/// Point-in-time view of a single run.
///
/// `status` and `conclusion` carry the provider's raw lifecycle strings;
/// `state` is the mapped display state. `conclusion` is only meaningful once
/// `status` reports completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub id: i64,
    pub state: RunState,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Latest-run column of a catalog row.
///
/// A workflow that has never produced a run is its own case rather than a
/// synthetic failed run, so the UI can render "never ran" distinctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LatestRun {
    NoRunsYet,
    Run(RunSnapshot),
}

impl LatestRun {
    pub fn as_run(&self) -> Option<&RunSnapshot> {
        match self {
            LatestRun::Run(run) => Some(run),
            LatestRun::NoRunsYet => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    #[serde(default)]
    pub protected: bool,
}

/// Dispatch-input kind; `options` exists only for `choice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Boolean,
    Choice { options: Vec<String> },
    Environment,
    Number,
}

/// One dispatch input derived from a workflow definition file.
///
/// Derived on demand, never persisted; absent fields take the defaults the
/// provider's form semantics assume (empty text, not required, string kind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchParameter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: ParameterKind,
}

/// Parameters the host passes when triggering a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerParams {
    pub pipeline_id: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<serde_json::Value>,
}

/// One row of the catalog table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub provider_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    pub latest_run: LatestRun,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<DispatchParameter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_serialized_only_for_choice() {
        let choice = DispatchParameter {
            name: "env".to_string(),
            description: String::new(),
            default: String::new(),
            required: false,
            kind: ParameterKind::Choice {
                options: vec!["dev".to_string(), "prod".to_string()],
            },
        };
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(json["type"], "choice");
        assert_eq!(json["options"], serde_json::json!(["dev", "prod"]));

        let plain = DispatchParameter {
            kind: ParameterKind::String,
            ..choice
        };
        let json = serde_json::to_value(&plain).unwrap();
        assert_eq!(json["type"], "string");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_latest_run_tag() {
        let none = serde_json::to_value(LatestRun::NoRunsYet).unwrap();
        assert_eq!(none["kind"], "no_runs_yet");

        let run = LatestRun::Run(RunSnapshot {
            id: 7,
            state: RunState::Running,
            status: "in_progress".to_string(),
            conclusion: None,
            web_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        assert_eq!(run.as_run().map(|r| r.id), Some(7));
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["kind"], "run");
        assert_eq!(json["state"], "running");
    }
}
