use clap::{Args, Subcommand};

mod create;
mod set_price;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Add a product to the catalog
    Create(create::CreateProductArgs),
    /// Change a product's catalog price
    SetPrice(set_price::SetPriceArgs),
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create::run(args).await,
        ProductSubcommand::SetPrice(args) => set_price::run(args).await,
    }
}
