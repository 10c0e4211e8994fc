//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use trolley_app::domain::carts::CartOperation;

use crate::{
    carts::{errors::observe, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart, creating an empty one on first access.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart with computed total"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.get",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let cart = observe(CartOperation::GetCart, state.app.carts.get_cart(user).await)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use trolley_app::domain::{
        carts::{CartsServiceError, CartsStoreError, MockCartsService},
        products::models::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart, make_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_cart_with_total() -> TestResult {
        let product = ProductUuid::new();
        let cart = make_cart(vec![make_item(product, 3, Decimal::new(2_50, 2))]);

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total, "7.50");
        assert_eq!(body.user_uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(
            body.items.first().map(|item| item.product_uuid),
            Some(product.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_storage_failure_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().once().return_once(|user| {
            Err(CartsServiceError::Storage {
                operation: CartOperation::GetCart,
                user,
                product: None,
                source: CartsStoreError::DuplicateCart,
            })
        });

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
