//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
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

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity for the line
    pub quantity: i32,
}

/// Update Cart Item Handler
///
/// Replaces the quantity of an existing line. The captured price is kept.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart item updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(product, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let product = ProductUuid::from_uuid(product.into_inner());

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(product));

    let item = observe(
        CartOperation::UpdateItem,
        state
            .app
            .carts
            .update_item(user, product, json.into_inner().quantity)
            .await,
    )?;

    Ok(Json(item.into()))
}
