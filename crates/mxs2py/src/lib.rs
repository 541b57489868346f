//! Command-line front end for the MAXScript to Python converter.
//!
//! The conversion itself lives in `mxs2py-surface-syntax`. This crate adds
//! what a working session needs around it: an on-disk identifier registry,
//! `include` expansion, config files, and snake_case rename suggestions.

pub mod commands;
pub mod config;
pub mod preprocess;
pub mod segment;
pub mod store;
pub mod stubs;
