use clap::{Parser, Subcommand};
use dishpatch_app::database::{self, Db};

mod db;
mod token;

#[derive(Debug, Parser)]
#[command(name = "dishpatch-app", about = "Dishpatch admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
