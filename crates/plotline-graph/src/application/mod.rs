//! Application layer: edit session plus command and query handlers.

pub mod command_handlers;
pub mod query_handlers;
pub mod session;
