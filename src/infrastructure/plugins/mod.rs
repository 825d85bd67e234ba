//! Plugin loading for plugbot
//!
//! Plugins are YAML manifests in the plugin directory. A manifest declares
//! commands and message handlers whose actions are either a fixed reply or
//! a handler compiled into the binary and registered in the catalog.

pub mod catalog;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use catalog::HandlerCatalog;
pub use loader::{plugin_name, PluginLoader};
pub use manifest::{Action, PluginManifest};
pub use registry::PluginRegistry;
