//! Dishpatch admin CLI

use std::process;

use clap::Parser as _;

mod cli;

/// Run the admin CLI.
#[tokio::main]
#[expect(clippy::exit, reason = "non-zero exit status for failed commands")]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
