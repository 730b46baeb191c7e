//! Demo and analysis drivers for the consistent hash ring.
//!
//! Provides commands for:
//! - Walking through ring behavior and membership changes
//! - Example integrations: load balancing, caching, sharding
//! - Comparing against naive modulo placement
//! - Analyzing distribution quality and lookup latency

pub mod commands;
pub mod config;

pub use commands::Command;
pub use config::CliConfig;
