use clap::Args;
use rust_decimal::Decimal;
use trolley_app::{
    database::{self, Db},
    domain::products::{PgProductsService, ProductsService, models::ProductUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetPriceArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product to reprice
    #[arg(long)]
    product_uuid: Uuid,

    /// New unit price; items already in carts keep their price
    #[arg(long)]
    price: Decimal,
}

pub(crate) async fn run(args: SetPriceArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let product = PgProductsService::new(Db::new(pool))
        .update_price(ProductUuid::from_uuid(args.product_uuid), args.price)
        .await
        .map_err(|error| format!("failed to update price: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("price: {}", product.price);

    Ok(())
}
