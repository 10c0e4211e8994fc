//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::models::{Cart, CartUuid},
    users::UserUuid,
};

const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const INSERT_CART_IF_ABSENT_SQL: &str = include_str!("../sql/insert_cart_if_absent.sql");
const GET_CART_BY_USER_SQL: &str = include_str!("../sql/get_cart_by_user.sql");
const LOCK_CART_BY_USER_SQL: &str = include_str!("../sql/lock_cart_by_user.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        user: UserUuid,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert an empty cart unless the user already has one. Returns whether a row was written.
    pub(crate) async fn insert_cart_if_absent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        user: UserUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(INSERT_CART_IF_ABSENT_SQL)
            .bind(cart.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Row-lock the user's cart until the transaction ends and advance `updated_at`.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(LOCK_CART_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
