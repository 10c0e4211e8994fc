//! Carts errors.

use std::fmt::{self, Display, Formatter};

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    products::{errors::is_numeric_overflow, models::ProductUuid},
    users::UserUuid,
};

/// Failures reported by a [`CartsStore`](crate::domain::carts::CartsStore).
#[derive(Debug, Error)]
pub enum CartsStoreError {
    /// A cart already exists for the user, or a concurrent creation could not be observed.
    #[error("cart already exists")]
    DuplicateCart,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart item not found")]
    ItemNotFound,

    /// A stored value was rejected by a constraint (for example a quantity overflow).
    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsStoreError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateCart,
            Some(ErrorKind::ForeignKeyViolation) => Self::ProductNotFound,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ if is_numeric_overflow(&error) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Cart operation, carried in storage failures and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    GetCart,
    AddItem,
    UpdateItem,
    RemoveItem,
    ClearCart,
}

impl CartOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetCart => "get_cart",
            Self::AddItem => "add_item",
            Self::UpdateItem => "update_item",
            Self::RemoveItem => "remove_item",
            Self::ClearCart => "clear_cart",
        }
    }
}

impl Display for CartOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart item not found")]
    CartItemNotFound,

    #[error(
        "{operation} failed for user {user}{}",
        product.map(|product| format!(", product {product}")).unwrap_or_default()
    )]
    Storage {
        operation: CartOperation,
        user: UserUuid,
        product: Option<ProductUuid>,
        #[source]
        source: CartsStoreError,
    },
}

impl CartsServiceError {
    /// Short, stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidQuantity => "invalid_quantity",
            Self::ProductNotFound => "product_not_found",
            Self::CartItemNotFound => "cart_item_not_found",
            Self::Storage { .. } => "storage",
        }
    }
}
