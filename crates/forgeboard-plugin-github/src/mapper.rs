//! Data mapping utilities for GitHub Actions

use forgeboard_plugin_api::{
    RunSnapshot,
    RunState,
};

use crate::types::WorkflowRun;

/// Maps a run's status and conclusion to the unified state.
///
/// `conclusion` is only consulted once `status` reports completion; an
/// in-flight run may already carry a stale conclusion field.
pub(crate) fn map_state(status: &str, conclusion: Option<&str>) -> RunState {
    match (status, conclusion) {
        ("completed", Some("success")) => RunState::Success,
        ("completed", Some("cancelled")) => RunState::Cancelled,
        ("completed", Some("skipped")) => RunState::Skipped,
        ("completed", _) => RunState::Failed,
        ("in_progress", _) => RunState::Running,
        _ => RunState::Pending,
    }
}

pub(crate) fn snapshot(run: &WorkflowRun) -> RunSnapshot {
    RunSnapshot {
        id: run.id,
        state: map_state(&run.status, run.conclusion.as_deref()),
        status: run.status.clone(),
        conclusion: run.conclusion.clone(),
        web_url: run.html_url.clone(),
        created_at: run.created_at,
        updated_at: run.updated_at,
    }
}
