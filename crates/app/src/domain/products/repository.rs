//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::domain::products::models::{Product, ProductUuid};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_PRICE_SQL: &str = include_str!("sql/update_product_price.sql");
const FIND_PRODUCT_PRICE_SQL: &str = include_str!("sql/find_product_price.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        price: Decimal,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        price: Decimal,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_PRICE_SQL)
            .bind(product.into_uuid())
            .bind(price)
            .fetch_one(&mut **tx)
            .await
    }

    /// Current unit price, or `None` when the product does not exist.
    pub(crate) async fn find_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        query_scalar::<Postgres, Decimal>(FIND_PRODUCT_PRICE_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            price: row.try_get("price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
