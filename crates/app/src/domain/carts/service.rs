//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, error, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::{CartOperation, CartsServiceError, CartsStoreError},
            models::{Cart, CartItem},
            store::{CartsStore, PgCartsStore},
        },
        products::models::ProductUuid,
        users::UserUuid,
    },
};

/// Cart service over any [`CartsStore`].
#[derive(Clone)]
pub struct StoreCartsService {
    store: Arc<dyn CartsStore>,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(store: Arc<dyn CartsStore>) -> Self {
        Self { store }
    }

    /// Service backed by [`PgCartsStore`].
    #[must_use]
    pub fn postgres(db: Db) -> Self {
        Self::new(Arc::new(PgCartsStore::new(db)))
    }
}

impl std::fmt::Debug for StoreCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCartsService").finish_non_exhaustive()
    }
}

fn ensure_positive(quantity: i32) -> Result<(), CartsServiceError> {
    if quantity <= 0 {
        return Err(CartsServiceError::InvalidQuantity);
    }

    Ok(())
}

fn into_service_error(
    operation: CartOperation,
    user: UserUuid,
    product: Option<ProductUuid>,
    source: CartsStoreError,
) -> CartsServiceError {
    match source {
        CartsStoreError::ProductNotFound => CartsServiceError::ProductNotFound,
        CartsStoreError::ItemNotFound => CartsServiceError::CartItemNotFound,
        CartsStoreError::InvalidData => CartsServiceError::InvalidQuantity,
        source @ (CartsStoreError::DuplicateCart | CartsStoreError::Sql(_)) => {
            error!(
                operation = %operation,
                user_uuid = %user,
                product_uuid = ?product.map(|product| product.to_string()),
                "cart operation failed: {source}"
            );

            CartsServiceError::Storage {
                operation,
                user,
                product,
                source,
            }
        }
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let result = match self.store.get_cart(user).await {
            Err(CartsStoreError::DuplicateCart) => {
                warn!(user_uuid = %user, "cart creation raced, retrying get_cart");

                self.store.get_cart(user).await
            }
            result => result,
        };

        result.map_err(|source| into_service_error(CartOperation::GetCart, user, None, source))
    }

    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsServiceError> {
        ensure_positive(quantity)?;

        let result = match self.store.add_item(user, product, quantity).await {
            Err(CartsStoreError::DuplicateCart) => {
                warn!(
                    user_uuid = %user,
                    product_uuid = %product,
                    "cart creation raced, retrying add_item"
                );

                self.store.add_item(user, product, quantity).await
            }
            result => result,
        };

        let item = result.map_err(|source| {
            into_service_error(CartOperation::AddItem, user, Some(product), source)
        })?;

        debug!(
            user_uuid = %user,
            product_uuid = %product,
            quantity = item.quantity,
            "added cart item"
        );

        Ok(item)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsServiceError> {
        ensure_positive(quantity)?;

        self.store
            .update_item(user, product, quantity)
            .await
            .map_err(|source| {
                into_service_error(CartOperation::UpdateItem, user, Some(product), source)
            })
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        self.store
            .remove_item(user, product)
            .await
            .map_err(|source| {
                into_service_error(CartOperation::RemoveItem, user, Some(product), source)
            })
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        self.store
            .clear_cart(user)
            .await
            .map_err(|source| into_service_error(CartOperation::ClearCart, user, None, source))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating an empty one on first access.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product to the user's cart, merging with an existing line.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Replace the quantity of an existing line.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove a line from the user's cart.
    async fn remove_item(&self, user: UserUuid, product: ProductUuid)
    -> Result<(), CartsServiceError>;

    /// Remove every line from the user's cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
