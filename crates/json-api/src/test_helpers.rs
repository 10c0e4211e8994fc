//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use trolley_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartItem, CartItemUuid, CartUuid},
        },
        products::{MockProductsService, models::ProductUuid},
        users::UserUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

const TEST_CART_UUID: CartUuid = CartUuid::from_uuid(Uuid::max());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_price().never();

    products
}

fn state(carts: MockCartsService, auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
        products: Arc::new(strict_products_mock()),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    state(carts, strict_auth_mock())
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_carts_mock(), auth)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn make_item(product: ProductUuid, quantity: i32, price: Decimal) -> CartItem {
    CartItem {
        uuid: CartItemUuid::new(),
        cart_uuid: TEST_CART_UUID,
        product_uuid: product,
        quantity,
        price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(items: Vec<CartItem>) -> Cart {
    Cart {
        uuid: TEST_CART_UUID,
        user_uuid: TEST_USER_UUID,
        items,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
