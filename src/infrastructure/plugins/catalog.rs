//! Handler catalog - named handlers that manifests may reference
//!
//! Manifests never carry code. A `handler: <name>` entry is resolved here
//! at load time; unknown names fail the plugin load.

use std::collections::HashMap;
use std::fmt;

use crate::application::errors::CommandError;
use crate::application::messaging::Context;
use crate::domain::entities::{handler, Handler, HandlerResult, Reply};

#[derive(Clone, Default)]
pub struct HandlerCatalog {
    handlers: HashMap<String, Handler>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the stock handlers: `echo`, `ping` and `version`
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        catalog.register("echo", |ctx| {
            if ctx.args.is_empty() {
                return Err(CommandError::InvalidArgs("nothing to echo".to_string()));
            }
            Ok(Some(Reply::text(ctx.args.join(" "))))
        });

        catalog.register("ping", |_| Ok(Some(Reply::text("pong"))));

        catalog.register("version", |_| {
            Ok(Some(Reply::text(format!("plugbot v{}", env!("CARGO_PKG_VERSION")))))
        });

        catalog
    }

    /// Register a handler, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(name, handler(f));
    }

    pub fn register_handler(&mut self, name: impl Into<String>, handler: Handler) {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::debug!("Replaced catalog handler: {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("handlers", &self.names())
            .finish()
    }
}
