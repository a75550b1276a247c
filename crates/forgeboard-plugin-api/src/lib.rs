pub mod detect;
pub mod discovery;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod schema;
pub mod types;

pub use detect::DetectionPolicy;
pub use discovery::{
    Discovery,
    StaticDiscovery,
};
pub use error::{
    PluginError,
    PluginResult,
};
pub use plugin::{
    Plugin,
    PluginCapabilities,
    PluginMetadata,
};
pub use registry::PluginRegistry;
pub use schema::{
    ConfigField,
    ConfigFieldType,
    ConfigSchema,
};
pub use types::{
    Branch,
    Commit,
    DispatchParameter,
    LatestRun,
    ParameterKind,
    Pipeline,
    RunSnapshot,
    RunState,
    TriggerParams,
};

#[macro_export]
macro_rules! register_plugin {
    ($plugin_type:ty) => {
        pub fn register(registry: &mut $crate::PluginRegistry) {
            registry.register(Box::new(<$plugin_type>::default()));
        }
    };
}
