//! Dispatch-input extraction from workflow definition files.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use forgeboard_plugin_api::{
    DispatchParameter,
    ParameterKind,
    PluginError,
    PluginResult,
};
use serde_yaml::Value;

/// Decodes a `contents` payload: base64 (newline-wrapped by the provider)
/// to UTF-8 text.
pub(crate) fn decode_content(content: &str) -> PluginResult<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| PluginError::Decode(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| PluginError::Decode(format!("content is not utf-8: {e}")))
}

/// Derives the dispatch inputs declared under `on.workflow_dispatch.inputs`,
/// in declaration order.
///
/// Workflows without manual dispatch yield an empty list, not an error.
pub(crate) fn extract_parameters(source: &str) -> PluginResult<Vec<DispatchParameter>> {
    let doc: Value = serde_yaml::from_str(source)
        .map_err(|e| PluginError::Decode(format!("invalid workflow yaml: {e}")))?;

    let inputs = match dispatch_inputs(&doc).and_then(Value::as_mapping) {
        Some(inputs) => inputs,
        None => return Ok(Vec::new()),
    };

    let mut parameters = Vec::with_capacity(inputs.len());
    for (key, value) in inputs {
        if let Some(name) = key.as_str() {
            parameters.push(parameter_from(name.to_string(), value));
        }
    }
    Ok(parameters)
}

fn dispatch_inputs(doc: &Value) -> Option<&Value> {
    let root = doc.as_mapping()?;
    let triggers = root.iter().find_map(|(key, value)| match key {
        Value::String(name) if name == "on" => Some(value),
        // YAML 1.1 readers resolve a bare `on` scalar to a boolean key.
        Value::Bool(true) => Some(value),
        _ => None,
    })?;
    lookup(triggers, "workflow_dispatch").and_then(|d| lookup(d, "inputs"))
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value
        .as_mapping()?
        .iter()
        .find_map(|(k, v)| (k.as_str() == Some(key)).then_some(v))
}

fn parameter_from(name: String, value: &Value) -> DispatchParameter {
    let description = lookup(value, "description")
        .map(scalar_text)
        .unwrap_or_default();
    let default = lookup(value, "default").map(scalar_text).unwrap_or_default();
    let required = lookup(value, "required")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let kind = match lookup(value, "type").and_then(Value::as_str) {
        Some("boolean") => ParameterKind::Boolean,
        Some("choice") => ParameterKind::Choice {
            options: options_of(value),
        },
        Some("environment") => ParameterKind::Environment,
        Some("number") => ParameterKind::Number,
        _ => ParameterKind::String,
    };

    DispatchParameter {
        name,
        description,
        default,
        required,
        kind,
    }
}

fn options_of(value: &Value) -> Vec<String> {
    lookup(value, "options")
        .and_then(Value::as_sequence)
        .map(|seq| seq.iter().map(scalar_text).collect())
        .unwrap_or_default()
}

/// Renders a YAML scalar the way a form field would display it.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPATCH_WORKFLOW: &str = r#"
name: deploy
on:
  workflow_dispatch:
    inputs:
      environment:
        description: Target environment
        type: choice
        required: true
        default: staging
        options:
          - staging
          - production
      dry_run:
        type: boolean
        default: false
      reason:
        description: Why this deploy is needed
jobs:
  deploy:
    runs-on: ubuntu-latest
"#;

    #[test]
    fn test_extracts_inputs_in_order_with_defaults() {
        let params = extract_parameters(DISPATCH_WORKFLOW).unwrap();
        assert_eq!(params.len(), 3);

        assert_eq!(params[0].name, "environment");
        assert_eq!(params[0].description, "Target environment");
        assert_eq!(params[0].default, "staging");
        assert!(params[0].required);
        assert_eq!(
            params[0].kind,
            ParameterKind::Choice {
                options: vec!["staging".to_string(), "production".to_string()],
            }
        );

        assert_eq!(params[1].name, "dry_run");
        assert_eq!(params[1].kind, ParameterKind::Boolean);
        assert_eq!(params[1].default, "false");

        // Unspecified fields fall back to form defaults.
        assert_eq!(params[2].name, "reason");
        assert_eq!(params[2].default, "");
        assert!(!params[2].required);
        assert_eq!(params[2].kind, ParameterKind::String);
    }

    #[test]
    fn test_workflow_without_dispatch_yields_empty_list() {
        let source = "name: ci\non:\n  push:\n    branches: [main]\njobs: {}\n";
        assert!(extract_parameters(source).unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_without_inputs_yields_empty_list() {
        let source = "name: manual\non:\n  workflow_dispatch: ~\n";
        assert!(extract_parameters(source).unwrap().is_empty());
    }

    #[test]
    fn test_input_with_no_fields_at_all() {
        let source = "on:\n  workflow_dispatch:\n    inputs:\n      bare: ~\n";
        let params = extract_parameters(source).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(
            params[0],
            DispatchParameter {
                name: "bare".to_string(),
                description: String::new(),
                default: String::new(),
                required: false,
                kind: ParameterKind::String,
            }
        );
    }

    #[test]
    fn test_boolean_true_trigger_key_is_accepted() {
        // Documents built by a YAML 1.1 reader key the triggers under
        // boolean true rather than the string "on".
        let mut root = serde_yaml::Mapping::new();
        let mut inputs = serde_yaml::Mapping::new();
        inputs.insert(Value::String("target".into()), Value::Null);
        let mut dispatch = serde_yaml::Mapping::new();
        dispatch.insert(Value::String("inputs".into()), Value::Mapping(inputs));
        let mut triggers = serde_yaml::Mapping::new();
        triggers.insert(
            Value::String("workflow_dispatch".into()),
            Value::Mapping(dispatch),
        );
        root.insert(Value::Bool(true), Value::Mapping(triggers));

        let source = serde_yaml::to_string(&Value::Mapping(root)).unwrap();
        let params = extract_parameters(&source).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "target");
    }

    #[test]
    fn test_unknown_type_degrades_to_string() {
        let source =
            "on:\n  workflow_dispatch:\n    inputs:\n      odd:\n        type: tri-state\n";
        let params = extract_parameters(source).unwrap();
        assert_eq!(params[0].kind, ParameterKind::String);
    }

    #[test]
    fn test_choice_without_options_gets_empty_list() {
        let source = "on:\n  workflow_dispatch:\n    inputs:\n      env:\n        type: choice\n";
        let params = extract_parameters(source).unwrap();
        assert_eq!(
            params[0].kind,
            ParameterKind::Choice {
                options: Vec::new()
            }
        );
    }

    #[test]
    fn test_invalid_yaml_is_a_decode_error() {
        let err = extract_parameters("on: [unbalanced").unwrap_err();
        assert!(matches!(err, PluginError::Decode(_)));
    }

    #[test]
    fn test_decode_content_strips_wrapping() {
        // "on:\n  workflow_dispatch: ~\n" base64-encoded and line-wrapped.
        let encoded = "b246CiAgd29ya2Zsb3df\nZGlzcGF0Y2g6IH4K\n";
        let text = decode_content(encoded).unwrap();
        assert_eq!(text, "on:\n  workflow_dispatch: ~\n");
    }

    #[test]
    fn test_decode_content_rejects_garbage() {
        assert!(matches!(
            decode_content("!!!not-base64!!!"),
            Err(PluginError::Decode(_))
        ));
    }
}
