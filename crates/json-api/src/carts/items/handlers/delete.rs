//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use trolley_app::domain::{carts::CartOperation, products::models::ProductUuid};

use crate::{carts::errors::observe, extensions::*, state::State};

/// Delete Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart item removed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.delete",
    skip(product, depot),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let product = ProductUuid::from_uuid(product.into_inner());

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(product));

    observe(
        CartOperation::RemoveItem,
        state.app.carts.remove_item(user, product).await,
    )?;

    tracing::info!(product_uuid = %product, "removed cart item");

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use trolley_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, carts_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("cart/items/{product}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_item_returns_200() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, p| *user == TEST_USER_UUID && *p == product)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/cart/items/{product}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_item_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::CartItemNotFound));

        let res = TestClient::delete(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_invalid_product_uuid_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_remove_item().never();

        let res = TestClient::delete("http://example.com/cart/items/123")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
