//! Cart response bodies

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::models::{Cart, CartItem};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The owner of the cart
    pub user_uuid: Uuid,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// Sum of every line total, as a decimal string
    pub total: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total = money(cart.total());

        CartResponse {
            uuid: cart.uuid.into(),
            user_uuid: cart.user_uuid.into(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The product on this line
    pub product_uuid: Uuid,

    /// Number of units
    pub quantity: i32,

    /// Unit price captured when the product was first added
    pub price: String,

    /// `price × quantity`
    pub line_total: String,

    /// The date and time the item was created
    pub created_at: String,

    /// The date and time the item was last updated
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
            price: money(item.price),
            line_total: money(item.line_total()),
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

fn money(amount: Decimal) -> String {
    format!("{amount:.2}")
}
