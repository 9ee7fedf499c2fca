//! # billed
//!
//! Command-line entry point. See [`cli`] for the commands.

mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    billed_app::init_tracing();

    let cli = Cli::parse();
    tracing::debug!(?cli, "CLI arguments parsed");

    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "billed exited with error");
    }
    result
}
