use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{
    PluginError,
    PluginResult,
};

/// Resolves a named backend to a base URL at call time.
///
/// Clients re-resolve on every request; implementations are free to cache
/// internally when the mapping is stable for the process lifetime.
#[async_trait]
pub trait Discovery: Send + Sync {
    async fn base_url(&self, plugin_id: &str) -> PluginResult<String>;
}

/// Fixed lookup table, for tests and single-host deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    urls: HashMap<String, String>,
    fallback: Option<String>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every plugin id resolves to the same base URL.
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            urls: HashMap::new(),
            fallback: Some(trim_url(url.into())),
        }
    }

    pub fn with_url(mut self, plugin_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.insert(plugin_id.into(), trim_url(url.into()));
        self
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[async_trait]
impl Discovery for StaticDiscovery {
    async fn base_url(&self, plugin_id: &str) -> PluginResult<String> {
        self.urls
            .get(plugin_id)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| {
                PluginError::InvalidConfig(format!("no base url registered for {plugin_id}"))
            })
    }
}
