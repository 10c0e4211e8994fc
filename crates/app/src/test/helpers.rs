//! Test Helpers

use rust_decimal::Decimal;

use crate::{
    domain::products::{
        ProductsService, ProductsServiceError,
        models::{NewProduct, Product, ProductUuid},
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    price: Decimal,
) -> Result<Product, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            price,
        })
        .await
}
