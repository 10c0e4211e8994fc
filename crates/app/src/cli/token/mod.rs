use clap::{Args, Subcommand};

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue an API token for a user
    Create(create::CreateTokenArgs),
    /// List a user's API tokens
    List(list::ListTokensArgs),
    /// Revoke an API token
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Create(args) => create::run(args).await,
        TokenSubcommand::List(args) => list::run(args).await,
        TokenSubcommand::Revoke(args) => revoke::run(args).await,
    }
}
