//! Errors

use salvo::http::StatusError;
use tracing::error;

use trolley_app::domain::carts::{CartOperation, CartsServiceError};

use crate::observability::record_cart_operation;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be greater than zero")
        }
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::CartItemNotFound => {
            StatusError::not_found().brief("Cart item not found")
        }
        CartsServiceError::Storage { ref source, .. } => {
            error!("{error}: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Count the outcome of `operation` and map failures to HTTP errors.
pub(crate) fn observe<T>(
    operation: CartOperation,
    result: Result<T, CartsServiceError>,
) -> Result<T, StatusError> {
    match result {
        Ok(value) => {
            record_cart_operation(operation.as_str(), "ok");

            Ok(value)
        }
        Err(error) => {
            record_cart_operation(operation.as_str(), error.kind());

            Err(into_status_error(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use trolley_app::domain::{carts::CartsStoreError, users::UserUuid};

    use super::*;

    #[test]
    fn not_found_kinds_map_to_404() {
        assert_eq!(
            into_status_error(CartsServiceError::ProductNotFound).code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            into_status_error(CartsServiceError::CartItemNotFound).code,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn invalid_quantity_maps_to_400() {
        assert_eq!(
            into_status_error(CartsServiceError::InvalidQuantity).code,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_failures_map_to_500() {
        let error = CartsServiceError::Storage {
            operation: CartOperation::ClearCart,
            user: UserUuid::new(),
            product: None,
            source: CartsStoreError::DuplicateCart,
        };

        assert_eq!(
            into_status_error(error).code,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn observe_passes_success_through() {
        let result = observe(CartOperation::GetCart, Ok::<_, CartsServiceError>(3));

        assert_eq!(result.ok(), Some(3));
    }
}
