//! Domain layer - Core business objects
//!
//! This layer contains:
//! - Entities: Users, messages, command and message bindings, plugin descriptors
//! - Traits: Abstractions for infrastructure (Bot)

pub mod entities;
pub mod traits;
