//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{products::models::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Cart Model
///
/// One per user, created on first access. The total is derived from the items
/// and never stored.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cart {
    /// Sum of `price × quantity` over all items; zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// The line item for `product`, if present.
    #[must_use]
    pub fn item(&self, product: ProductUuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_uuid == product)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: i32,
    /// Unit price captured when the product was first added.
    pub price: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// NewCartItem Model
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: i32,
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(cart: CartUuid, price: Decimal, quantity: i32) -> CartItem {
        CartItem {
            uuid: CartItemUuid::new(),
            cart_uuid: cart,
            product_uuid: ProductUuid::new(),
            quantity,
            price,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn make_cart(items: impl FnOnce(CartUuid) -> Vec<CartItem>) -> Cart {
        let uuid = CartUuid::new();

        Cart {
            uuid,
            user_uuid: UserUuid::new(),
            items: items(uuid),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let cart = make_cart(|uuid| {
            vec![
                make_item(uuid, Decimal::new(10_50, 2), 2),
                make_item(uuid, Decimal::new(15_75, 2), 1),
            ]
        });

        assert_eq!(cart.total(), Decimal::new(36_75, 2));
    }

    #[test]
    fn total_of_empty_cart_is_zero() {
        let cart = make_cart(|_| Vec::new());

        assert_eq!(cart.total(), Decimal::ZERO);
        assert!(cart.is_empty(), "cart without items should be empty");
    }

    #[test]
    fn line_total_keeps_cents() {
        let item = make_item(CartUuid::new(), Decimal::new(3_33, 2), 3);

        assert_eq!(item.line_total(), Decimal::new(9_99, 2));
    }

    #[test]
    fn item_finds_line_by_product() {
        let cart = make_cart(|uuid| vec![make_item(uuid, Decimal::ONE, 1)]);
        let product = cart.items.first().map(|item| item.product_uuid);

        assert!(product.and_then(|product| cart.item(product)).is_some());
        assert!(cart.item(ProductUuid::new()).is_none());
    }
}
