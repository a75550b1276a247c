//! GitHub Actions plugin metadata
//!
//! This module contains plugin metadata, configuration schema, and
//! capabilities.

use forgeboard_plugin_api::*;

use crate::config::DEFAULT_PROXY_PATH;

/// Creates the plugin metadata for GitHub Actions
pub fn create_metadata() -> PluginMetadata {
    PluginMetadata {
        name: "GitHub Actions".to_string(),
        provider_type: "github".to_string(),
        version: "0.1.0".to_string(),
        description: "Monitor, trigger and cancel GitHub Actions workflow runs".to_string(),
        config_schema: create_config_schema(),
        capabilities: create_capabilities(),
    }
}

/// Creates the configuration schema for GitHub Actions
///
/// Defines two optional fields:
/// - `proxy_path`: proxy route fronting the GitHub API
/// - `workflow_files`: definition-file names to surface
fn create_config_schema() -> ConfigSchema {
    ConfigSchema::new()
        .add_field(ConfigField {
            key: "proxy_path".to_string(),
            label: "Proxy Path".to_string(),
            description: Some(
                "Path of the proxy route that fronts the GitHub API".to_string(),
            ),
            field_type: ConfigFieldType::Text,
            required: false,
            default_value: Some(DEFAULT_PROXY_PATH.to_string()),
            options: None,
        })
        .add_field(ConfigField {
            key: "workflow_files".to_string(),
            label: "Workflow Files".to_string(),
            description: Some(
                "Comma-separated workflow file names to surface; empty shows all workflows"
                    .to_string(),
            ),
            field_type: ConfigFieldType::Text,
            required: false,
            default_value: None,
            options: None,
        })
}

fn create_capabilities() -> PluginCapabilities {
    PluginCapabilities {
        pipelines: true,
        branches: true,
        trigger: true,
        cancel: true,
        dispatch_parameters: true,
    }
}
