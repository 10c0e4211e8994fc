use clap::Args;
use rust_decimal::Decimal;
use trolley_app::{
    database::{self, Db},
    domain::products::{
        PgProductsService, ProductsService,
        models::{NewProduct, ProductUuid},
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Unit price, e.g. 10.50
    #[arg(long)]
    price: Decimal,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let uuid = args
        .product_uuid
        .map_or_else(ProductUuid::new, ProductUuid::from_uuid);

    let product = PgProductsService::new(Db::new(pool))
        .create_product(NewProduct {
            uuid,
            price: args.price,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("price: {}", product.price);

    Ok(())
}
