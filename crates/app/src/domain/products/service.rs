//! Products service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_product(&mut tx, product.uuid, product.price)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_price(
        &self,
        product: ProductUuid,
        price: Decimal,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_price(&mut tx, product, price).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product with the given price.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Changes the current catalog price. Cart items keep the price they were added with.
    async fn update_price(
        &self,
        product: ProductUuid,
        price: Decimal,
    ) -> Result<Product, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_product_returns_product_with_price() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                price: Decimal::new(10_50, 2),
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, Decimal::new(10_50, 2));

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                price: Decimal::ONE,
            })
            .await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                uuid,
                price: Decimal::ONE,
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn negative_price_returns_invalid_data() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                price: Decimal::new(-1, 0),
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_price_changes_catalog_price() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                price: Decimal::new(5_00, 2),
            })
            .await?;

        let updated = ctx
            .products
            .update_price(uuid, Decimal::new(7_25, 2))
            .await?;

        assert_eq!(updated.price, Decimal::new(7_25, 2));
        assert_eq!(
            ctx.products.get_product(uuid).await?.price,
            Decimal::new(7_25, 2)
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_price_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_price(ProductUuid::new(), Decimal::ONE)
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
