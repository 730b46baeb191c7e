//! Command-line configuration.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Top-level CLI configuration.
#[derive(Debug, Parser)]
#[command(
    name = "hashring",
    about = "Consistent hash ring demos and distribution analysis",
    version
)]
pub struct CliConfig {
    /// Virtual nodes per server.
    #[arg(long, global = true, default_value_t = 150)]
    pub vnodes: usize,

    /// Log level when RUST_LOG is unset (e.g. "info", "debug").
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Initialize the console tracing subscriber. Call once, before [`run`].
    ///
    /// [`run`]: CliConfig::run
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Dispatch to the selected command.
    pub fn run(&self) -> anyhow::Result<()> {
        self.command.run(self.vnodes)
    }
}
