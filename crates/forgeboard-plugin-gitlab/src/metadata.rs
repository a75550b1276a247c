//! GitLab CI plugin metadata

use forgeboard_plugin_api::*;

use crate::config::DEFAULT_PROXY_PATH;

pub fn create_metadata() -> PluginMetadata {
    PluginMetadata {
        name: "GitLab CI".to_string(),
        provider_type: "gitlab".to_string(),
        version: "0.1.0".to_string(),
        description: "Monitor, trigger and cancel GitLab CI pipelines".to_string(),
        config_schema: create_config_schema(),
        capabilities: create_capabilities(),
    }
}

fn create_config_schema() -> ConfigSchema {
    ConfigSchema::new()
        .add_field(ConfigField {
            key: "proxy_path".to_string(),
            label: "Proxy Path".to_string(),
            description: Some("Path of the proxy route that fronts the GitLab API".to_string()),
            field_type: ConfigFieldType::Text,
            required: false,
            default_value: Some(DEFAULT_PROXY_PATH.to_string()),
            options: None,
        })
        .add_field(ConfigField {
            key: "default_ref".to_string(),
            label: "Default Ref".to_string(),
            description: Some(
                "Branch or tag used when a trigger does not name one".to_string(),
            ),
            field_type: ConfigFieldType::Text,
            required: false,
            default_value: Some("main".to_string()),
            options: None,
        })
}

fn create_capabilities() -> PluginCapabilities {
    PluginCapabilities {
        pipelines: true,
        branches: true,
        trigger: true,
        cancel: true,
        // The trigger form is a fixed ref field; there is no per-pipeline
        // definition file to derive inputs from.
        dispatch_parameters: false,
    }
}
