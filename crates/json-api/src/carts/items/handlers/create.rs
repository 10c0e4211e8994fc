//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::{carts::CartOperation, products::models::ProductUuid};

use crate::{
    carts::{errors::observe, responses::CartItemResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    /// Product to add
    pub product_id: Uuid,

    /// Units to add, merged into an existing line for the same product
    pub quantity: i32,
}

/// Create Cart Item Handler
///
/// Adds a product to the caller's cart at the current catalog price. Adding a
/// product already in the cart increases its quantity and keeps the first
/// captured price.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item created or merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity must be greater than zero"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();
    let product = ProductUuid::from_uuid(request.product_id);

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(product));
    span.record("quantity", request.quantity);

    let item = observe(
        CartOperation::AddItem,
        state
            .app
            .carts
            .add_item(user, product, request.quantity)
            .await,
    )?;

    res.add_header(LOCATION, format!("/cart/items/{product}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
