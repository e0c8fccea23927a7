//! legendtoc: legend table-of-contents for map services
//!
//! Builds a menu of a map's operational services and their sub-layers and
//! computes the visible sub-layer set when entries are checked or unchecked,
//! propagating toggles through group layers.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
