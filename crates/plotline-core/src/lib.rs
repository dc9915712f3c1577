//! Plotline Core: shared domain abstractions.
//!
//! This crate defines the script graph and catalogue records and the seams
//! every other crate depends on: time, scheduling, persistence, and errors.
//! It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod script;
pub mod store;
