use clap::{Parser, Subcommand};

mod db;
mod product;
mod token;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    Token(token::TokenCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Token(command) => token::run(command).await,
        }
    }
}
