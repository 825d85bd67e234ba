//! Message handling - routing updates to plugin handlers

pub mod context;
pub mod dispatcher;
pub mod parser;
pub mod router;

pub use context::Context;
pub use dispatcher::{MessageDispatcher, Outgoing};
pub use router::{route_command, route_inline, route_message};
