//! GitHub Actions plugin for Forgeboard
//!
//! Surfaces workflow and run status from a repository's GitHub Actions,
//! routed through a discovery-resolved proxy so credentials stay
//! server-side. Supports:
//! - Listing workflows with their latest run and dispatch parameters
//! - Deriving dispatch-input forms from the workflow definition file
//! - Triggering runs (with detection of the asynchronously created run)
//! - Cancelling in-flight runs
//!
//! # Example Usage
//!
//! ```no_run
//! use forgeboard_plugin_api::{Plugin, PluginRegistry};
//! use forgeboard_plugin_github::GitHubWorkflowsPlugin;
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(GitHubWorkflowsPlugin::new()));
//! ```

pub mod client;
mod config;
mod mapper;
mod metadata;
mod params;
mod plugin;
pub mod types;

pub use client::WorkflowsClient;
pub use plugin::GitHubWorkflowsPlugin;

forgeboard_plugin_api::register_plugin!(GitHubWorkflowsPlugin);
