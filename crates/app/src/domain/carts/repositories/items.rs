//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::models::{CartItem, CartItemUuid, CartUuid, NewCartItem},
    products::models::ProductUuid,
    users::UserUuid,
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const UPDATE_CART_ITEM_QUANTITY_SQL: &str = include_str!("../sql/update_cart_item_quantity.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert the item, or add its quantity to the existing line for the same product.
    ///
    /// The stored price of an existing line is left untouched.
    pub(crate) async fn upsert_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(UPSERT_CART_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_cart_item_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(UPDATE_CART_ITEM_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEMS_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
