//! Cart store.
//!
//! [`PgCartsStore`] runs every operation in its own transaction. Mutations lock
//! the user's cart row before touching any item row, so two writers on the same
//! cart always acquire locks in the same order. Dropping an operation's future
//! drops its transaction, which rolls back.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, instrument};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsStoreError,
            models::{Cart, CartItem, CartItemUuid, CartUuid, NewCartItem},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{models::ProductUuid, repository::PgProductsRepository},
        users::UserUuid,
    },
};

/// Attempts at observing a cart after a conflict-tolerant insert.
const CART_RESOLVE_ATTEMPTS: usize = 2;

#[derive(Debug, Clone)]
pub struct PgCartsStore {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Get-or-create the user's cart. With `lock` the row is also locked and touched.
    async fn resolve_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        lock: bool,
    ) -> Result<Cart, CartsStoreError> {
        for _ in 0..CART_RESOLVE_ATTEMPTS {
            let inserted = self
                .carts_repository
                .insert_cart_if_absent(tx, CartUuid::new(), user)
                .await?;

            if inserted {
                debug!(user_uuid = %user, "created cart");
            }

            let cart = if lock {
                self.carts_repository.lock_cart(tx, user).await?
            } else {
                self.carts_repository.find_cart(tx, user).await?
            };

            if let Some(cart) = cart {
                return Ok(cart);
            }
        }

        Err(CartsStoreError::DuplicateCart)
    }
}

#[async_trait]
impl CartsStore for PgCartsStore {
    #[instrument(skip_all, fields(user_uuid = %user), err)]
    async fn create_cart(&self, user: UserUuid) -> Result<Cart, CartsStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self
            .carts_repository
            .create_cart(&mut tx, CartUuid::new(), user)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[instrument(skip_all, fields(user_uuid = %user), err)]
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut cart = self.resolve_cart(&mut tx, user, false).await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }

    #[instrument(
        skip_all,
        fields(user_uuid = %user, product_uuid = %product, quantity = quantity),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, user, true).await?;

        let price = self
            .products_repository
            .find_price(&mut tx, product)
            .await?
            .ok_or(CartsStoreError::ProductNotFound)?;

        let item = self
            .items_repository
            .upsert_cart_item(
                &mut tx,
                cart.uuid,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity,
                    price,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    #[instrument(
        skip_all,
        fields(user_uuid = %user, product_uuid = %product, quantity = quantity),
        err
    )]
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        if self.carts_repository.lock_cart(&mut tx, user).await?.is_none() {
            return Err(CartsStoreError::ItemNotFound);
        }

        let item = self
            .items_repository
            .update_cart_item_quantity(&mut tx, user, product, quantity)
            .await?
            .ok_or(CartsStoreError::ItemNotFound)?;

        tx.commit().await?;

        Ok(item)
    }

    #[instrument(skip_all, fields(user_uuid = %user, product_uuid = %product), err)]
    async fn remove_item(&self, user: UserUuid, product: ProductUuid) -> Result<(), CartsStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        if self.carts_repository.lock_cart(&mut tx, user).await?.is_none() {
            return Err(CartsStoreError::ItemNotFound);
        }

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, user, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsStoreError::ItemNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip_all, fields(user_uuid = %user), err)]
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        if self.carts_repository.lock_cart(&mut tx, user).await?.is_some() {
            let removed = self
                .items_repository
                .delete_cart_items(&mut tx, user)
                .await?;

            debug!(user_uuid = %user, removed, "cleared cart");
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Persistence port for carts.
///
/// Every operation is atomic with respect to the user's cart.
#[automock]
#[async_trait]
pub trait CartsStore: Send + Sync {
    /// Creates an empty cart. Fails with [`CartsStoreError::DuplicateCart`] when one exists.
    async fn create_cart(&self, user: UserUuid) -> Result<Cart, CartsStoreError>;

    /// Returns the user's cart with its items, creating an empty one when absent.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsStoreError>;

    /// Adds `quantity` of `product`, merging into an existing line for the same product.
    ///
    /// A new line captures the product's current catalog price.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsStoreError>;

    /// Replaces the quantity of an existing line.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsStoreError>;

    /// Removes the line for `product`.
    async fn remove_item(&self, user: UserUuid, product: ProductUuid) -> Result<(), CartsStoreError>;

    /// Removes every line. Succeeds when the cart is already empty or absent.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsStoreError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use sqlx::query_scalar;
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::domain::products::service::ProductsService;
    use crate::test::{TestContext, helpers::create_product};

    use super::*;

    #[tokio::test]
    async fn get_cart_creates_empty_cart_once() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx.store.get_cart(user).await?;
        let second = ctx.store.get_cart(user).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.user_uuid, user);
        assert!(first.is_empty(), "new cart should be empty");

        Ok(())
    }

    #[tokio::test]
    async fn create_cart_twice_returns_duplicate_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.store.create_cart(user).await?;

        let result = ctx.store.create_cart(user).await;

        assert!(
            matches!(result, Err(CartsStoreError::DuplicateCart)),
            "expected DuplicateCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_cart_after_get_cart_returns_duplicate_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.store.get_cart(user).await?;

        let result = ctx.store.create_cart(user).await;

        assert!(
            matches!(result, Err(CartsStoreError::DuplicateCart)),
            "expected DuplicateCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_captures_catalog_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, Decimal::new(10_50, 2)).await?;

        let item = ctx.store.add_item(user, product.uuid, 2).await?;

        assert_eq!(item.product_uuid, product.uuid);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Decimal::new(10_50, 2));

        let cart = ctx.store.get_cart(user).await?;

        assert_eq!(cart.uuid, item.cart_uuid);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total(), Decimal::new(21_00, 2));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_merges_quantity_and_keeps_first_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, Decimal::new(10_00, 2)).await?;

        let first = ctx.store.add_item(user, product.uuid, 2).await?;

        ctx.products
            .update_price(product.uuid, Decimal::new(12_00, 2))
            .await?;

        let merged = ctx.store.add_item(user, product.uuid, 3).await?;

        assert_eq!(merged.uuid, first.uuid);
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.price, Decimal::new(10_00, 2));

        let cart = ctx.store.get_cart(user).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total(), Decimal::new(50_00, 2));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_leaves_no_cart_behind() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let result = ctx.store.add_item(user, ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsStoreError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        let carts: i64 = query_scalar("SELECT COUNT(*) FROM carts WHERE user_uuid = $1")
            .bind(user.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(carts, 0, "failed add must not create a cart");

        Ok(())
    }

    #[tokio::test]
    async fn add_item_quantity_overflow_returns_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, Decimal::ONE).await?;

        ctx.store.add_item(user, product.uuid, i32::MAX).await?;

        let result = ctx.store.add_item(user, product.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsStoreError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        let cart = ctx.store.get_cart(user).await?;

        assert_eq!(
            cart.item(product.uuid).map(|item| item.quantity),
            Some(i32::MAX)
        );

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_merge_into_single_line() -> TestResult {
        const ADDS: i32 = 8;

        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, Decimal::new(2_50, 2)).await?;
        let store = Arc::new(ctx.store.clone());

        let mut tasks = JoinSet::new();

        for _ in 0..ADDS {
            let store = Arc::clone(&store);

            tasks.spawn(async move { store.add_item(user, product.uuid, 1).await });
        }

        while let Some(result) = tasks.join_next().await {
            result??;
        }

        let cart = ctx.store.get_cart(user).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(
            cart.item(product.uuid).map(|item| item.quantity),
            Some(ADDS)
        );

        let carts: i64 = query_scalar("SELECT COUNT(*) FROM carts WHERE user_uuid = $1")
            .bind(user.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(carts, 1, "concurrent adds must share one cart");

        Ok(())
    }

    #[tokio::test]
    async fn update_item_replaces_quantity_and_keeps_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, Decimal::new(4_00, 2)).await?;

        ctx.store.add_item(user, product.uuid, 1).await?;

        ctx.products
            .update_price(product.uuid, Decimal::new(9_00, 2))
            .await?;

        let item = ctx.store.update_item(user, product.uuid, 7).await?;

        assert_eq!(item.quantity, 7);
        assert_eq!(item.price, Decimal::new(4_00, 2));

        Ok(())
    }

    #[tokio::test]
    async fn update_missing_item_returns_not_found_and_leaves_others() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, Decimal::ONE).await?;

        ctx.store.add_item(user, product.uuid, 3).await?;

        let before = ctx.store.get_cart(user).await?;

        let result = ctx.store.update_item(user, ProductUuid::new(), 2).await;

        assert!(
            matches!(result, Err(CartsStoreError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        let after = ctx.store.get_cart(user).await?;

        assert_eq!(
            after.item(product.uuid).map(|item| item.quantity),
            Some(3)
        );
        assert_eq!(after.updated_at, before.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_without_cart_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .store
            .update_item(UserUuid::new(), ProductUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsStoreError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_deletes_only_that_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let kept = create_product(&ctx, Decimal::ONE).await?;
        let removed = create_product(&ctx, Decimal::TWO).await?;

        ctx.store.add_item(user, kept.uuid, 1).await?;
        ctx.store.add_item(user, removed.uuid, 1).await?;

        ctx.store.remove_item(user, removed.uuid).await?;

        let cart = ctx.store.get_cart(user).await?;

        assert_eq!(cart.items.len(), 1);
        assert!(cart.item(kept.uuid).is_some(), "other lines must remain");

        let result = ctx.store.remove_item(user, removed.uuid).await;

        assert!(
            matches!(result, Err(CartsStoreError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn items_are_scoped_to_their_user() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let other = UserUuid::new();
        let product = create_product(&ctx, Decimal::ONE).await?;

        ctx.store.add_item(owner, product.uuid, 1).await?;
        ctx.store.get_cart(other).await?;

        let result = ctx.store.remove_item(other, product.uuid).await;

        assert!(
            matches!(result, Err(CartsStoreError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        assert_eq!(ctx.store.get_cart(owner).await?.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_removes_all_items_and_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let first = create_product(&ctx, Decimal::ONE).await?;
        let second = create_product(&ctx, Decimal::TWO).await?;

        ctx.store.add_item(user, first.uuid, 1).await?;
        ctx.store.add_item(user, second.uuid, 4).await?;

        let cart = ctx.store.get_cart(user).await?;

        ctx.store.clear_cart(user).await?;
        ctx.store.clear_cart(user).await?;

        let cleared = ctx.store.get_cart(user).await?;

        assert_eq!(cleared.uuid, cart.uuid, "clear keeps the cart row");
        assert!(cleared.is_empty(), "cleared cart should be empty");
        assert_eq!(cleared.total(), Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_for_unknown_user_succeeds() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.store.clear_cart(UserUuid::new()).await?;

        Ok(())
    }
}
