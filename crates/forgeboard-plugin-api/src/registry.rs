use std::collections::HashMap;

use crate::plugin::Plugin;

/// Plugin registry - manages all registered providers, keyed by type.
pub struct PluginRegistry {
    plugins: HashMap<String, Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a plugin; a later registration for the same provider type
    /// replaces the earlier one.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        let provider_type = plugin.provider_type().to_string();
        self.plugins.insert(provider_type, plugin);
    }

    pub fn get(&self, provider_type: &str) -> Option<&dyn Plugin> {
        self.plugins.get(provider_type).map(|p| p.as_ref())
    }

    /// Mutable access, needed to `initialize` after registration.
    pub fn get_mut(&mut self, provider_type: &str) -> Option<&mut Box<dyn Plugin>> {
        self.plugins.get_mut(provider_type)
    }

    pub fn is_registered(&self, provider_type: &str) -> bool {
        self.plugins.contains_key(provider_type)
    }

    pub fn provider_types(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.plugins.len()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
