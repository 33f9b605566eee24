//! Product catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

/// Postgres [`ProductCatalog`].
#[derive(Debug, Clone)]
pub struct PgProductCatalog {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductCatalog {
    /// Create a catalog over the shared pool.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        Ok(self.repository.get_product(self.db.pool(), product).await?)
    }
}

/// Read-only product lookup.
#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a live (not soft-deleted) product with its current price, stock
    /// and active flag.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::TestContext;

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn get_product_returns_catalog_row() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.insert_product(1_000, Some(800), 5).await?;

        let found = ctx.catalog.get_product(product).await?;

        assert_eq!(found.uuid, product, "should return the requested product");
        assert_eq!(found.price, 1_000, "list price should round trip");
        assert_eq!(found.discount_price, Some(800), "discount should round trip");
        assert_eq!(found.stock, 5, "stock should round trip");
        assert!(found.is_active, "new products are active");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn get_product_missing_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn get_product_hides_soft_deleted_rows() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.insert_product(1_000, None, 5).await?;

        ctx.soft_delete_product(product).await?;

        let result = ctx.catalog.get_product(product).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
