//! Plugin system for plugbot
//!
//! Provides the interface every command provider implements, whether it is
//! compiled in (the core command set) or built from a manifest on disk.

pub mod trait_def;

pub use trait_def::{Plugin, StaticPlugin};
