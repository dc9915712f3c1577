//! Domain layer for script graphs.

pub mod commands;
pub mod events;
pub mod graph;
pub mod layout;
pub mod seed;
pub mod trace;
pub mod view;
