//! Plotline: script catalogue.
//!
//! Creates, lists, renames, tags and soft-deletes the scripts whose graphs
//! the editor works on.

pub mod application;
pub mod domain;
