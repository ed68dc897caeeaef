//! # guardbar-cli
//!
//! Command-line front end for the GuardBar status engine.
//!
//! ## Features
//!
//! - **Status**: protection state, query statistics and the derived icon
//! - **Toggling**: enable, disable, or disable for a preset duration with a
//!   live countdown and automatic re-enable
//! - **Watch mode**: poll and print every state change
//! - **Multiple output formats**: Pretty, JSON, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
