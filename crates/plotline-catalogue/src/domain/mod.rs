//! Catalogue domain: commands and the rules for building script records.

pub mod commands;
pub mod records;
