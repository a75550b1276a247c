pub mod client;
mod config;
mod mapper;
mod metadata;
mod plugin;
pub mod types;

pub use client::PipelinesClient;
pub use plugin::GitLabPipelinesPlugin;

forgeboard_plugin_api::register_plugin!(GitLabPipelinesPlugin);
