use forgeboard_plugin_api::{
    Branch,
    Commit,
    RunSnapshot,
    RunState,
};

use crate::types;

pub(crate) fn map_status(gitlab_status: &str) -> RunState {
    match gitlab_status {
        "success" => RunState::Success,
        "failed" => RunState::Failed,
        "running" => RunState::Running,
        "canceled" | "cancelled" => RunState::Cancelled,
        "skipped" => RunState::Skipped,
        _ => RunState::Pending,
    }
}

pub(crate) fn snapshot(pipeline: &types::Pipeline) -> RunSnapshot {
    RunSnapshot {
        id: pipeline.id,
        state: map_status(&pipeline.status),
        status: pipeline.status.clone(),
        // GitLab folds the outcome into a single status string.
        conclusion: None,
        web_url: Some(pipeline.web_url.clone()),
        created_at: pipeline.created_at,
        updated_at: pipeline.updated_at,
    }
}

pub(crate) fn map_branch(branch: types::RepoBranch) -> Branch {
    Branch {
        name: branch.name,
        commit: branch.commit.map(|c| Commit {
            sha: c.id,
            url: c.web_url.unwrap_or_default(),
        }),
        protected: branch.protected,
    }
}
