//! Cart store: the durable source of truth for carts and their lines.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::carts::{
        errors::CartStoreError,
        records::{CartLineRecord, CartLineUuid, CartRecord, CartUuid},
        repositories::{LineRow, PgCartLinesRepository, PgCartsRepository},
    },
    users::UserUuid,
};

/// Persistence seam for carts. Each call commits on its own; callers that
/// chain several calls get no atomicity across them.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the user's cart with its lines, if one exists.
    async fn find_cart_by_user(&self, user: UserUuid) -> Result<Option<CartRecord>, CartStoreError>;

    /// Create an empty cart for the user. Returns the existing cart when one
    /// was created concurrently.
    async fn create_cart(&self, user: UserUuid) -> Result<CartRecord, CartStoreError>;

    /// Find a line only if it belongs to the user's cart.
    async fn find_line(
        &self,
        user: UserUuid,
        line: CartLineUuid,
    ) -> Result<Option<CartLineRecord>, CartStoreError>;

    /// Insert the line or overwrite the cart's line for the same product.
    async fn upsert_line(&self, line: CartLineRecord) -> Result<CartLineRecord, CartStoreError>;

    /// Delete a line scoped to the user's cart. Returns the number of rows removed.
    async fn delete_line(&self, user: UserUuid, line: CartLineUuid) -> Result<u64, CartStoreError>;

    /// Delete every line of a cart. Returns the number of rows removed.
    async fn delete_all_lines(&self, cart: CartUuid) -> Result<u64, CartStoreError>;

    /// Persist the cart's derived total.
    async fn save_cart(&self, cart: CartUuid, total: u64) -> Result<(), CartStoreError>;
}

/// Postgres [`CartStore`].
#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
}

impl PgCartStore {
    /// Create a store over the shared pool.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_cart_by_user(&self, user: UserUuid) -> Result<Option<CartRecord>, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let Some(mut cart) = self.carts_repository.find_cart_by_user(&mut tx, user).await? else {
            tx.commit().await?;

            return Ok(None);
        };

        cart.lines = self
            .lines_repository
            .get_cart_lines(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(Some(cart))
    }

    async fn create_cart(&self, user: UserUuid) -> Result<CartRecord, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .carts_repository
            .create_cart(&mut tx, CartUuid::new(), user)
            .await?;

        cart.lines = self
            .lines_repository
            .get_cart_lines(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn find_line(
        &self,
        user: UserUuid,
        line: CartLineUuid,
    ) -> Result<Option<CartLineRecord>, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let line = self.lines_repository.find_line(&mut tx, line, user).await?;

        tx.commit().await?;

        Ok(line)
    }

    async fn upsert_line(&self, line: CartLineRecord) -> Result<CartLineRecord, CartStoreError> {
        let row = LineRow {
            quantity: i32::try_from(line.quantity)?,
            price: i64::try_from(line.price)?,
            total: i64::try_from(line.total)?,
        };

        let mut tx = self.db.begin().await?;

        let saved = self.lines_repository.upsert_line(&mut tx, &line, row).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn delete_line(&self, user: UserUuid, line: CartLineUuid) -> Result<u64, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.lines_repository.delete_line(&mut tx, line, user).await?;

        tx.commit().await?;

        Ok(rows_affected)
    }

    async fn delete_all_lines(&self, cart: CartUuid) -> Result<u64, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.lines_repository.delete_all_lines(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(rows_affected)
    }

    async fn save_cart(&self, cart: CartUuid, total: u64) -> Result<(), CartStoreError> {
        let total = i64::try_from(total)?;

        let mut tx = self.db.begin().await?;

        self.carts_repository.save_cart(&mut tx, cart, total).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::products::records::{ProductUuid, VendorUuid},
        test::TestContext,
    };

    fn new_line(cart: CartUuid, product: ProductUuid, quantity: u32, price: u64) -> CartLineRecord {
        CartLineRecord {
            uuid: CartLineUuid::new(),
            cart_uuid: cart,
            product_uuid: product,
            vendor_uuid: VendorUuid::new(),
            quantity,
            price,
            total: price * u64::from(quantity),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn create_cart_is_idempotent_per_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx.store.create_cart(user).await?;
        let second = ctx.store.create_cart(user).await?;

        assert_eq!(first.uuid, second.uuid, "a user owns exactly one cart");
        assert_eq!(first.total, 0, "new carts are empty");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn find_cart_by_user_returns_none_before_creation() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.store.find_cart_by_user(UserUuid::new()).await?;

        assert!(cart.is_none(), "no cart should exist yet");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn upsert_line_merges_by_product() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = ctx.store.create_cart(user).await?;
        let product = ProductUuid::new();

        let first = ctx.store.upsert_line(new_line(cart.uuid, product, 1, 500)).await?;
        let second = ctx.store.upsert_line(new_line(cart.uuid, product, 3, 450)).await?;

        assert_eq!(first.uuid, second.uuid, "same product keeps the original line");
        assert_eq!(second.quantity, 3, "quantity is overwritten, not added");
        assert_eq!(second.price, 450, "price is overwritten");
        assert_eq!(second.total, 1_350, "total is overwritten");

        let loaded = ctx.store.find_cart_by_user(user).await?.ok_or("cart missing")?;

        assert_eq!(loaded.lines.len(), 1, "only one line per product");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn find_and_delete_line_are_scoped_to_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let other = UserUuid::new();
        let cart = ctx.store.create_cart(owner).await?;
        ctx.store.create_cart(other).await?;

        let line = ctx
            .store
            .upsert_line(new_line(cart.uuid, ProductUuid::new(), 2, 500))
            .await?;

        assert!(
            ctx.store.find_line(other, line.uuid).await?.is_none(),
            "another user must not see the line"
        );
        assert_eq!(
            ctx.store.delete_line(other, line.uuid).await?,
            0,
            "another user must not delete the line"
        );
        assert!(
            ctx.store.find_line(owner, line.uuid).await?.is_some(),
            "owner still sees the line"
        );
        assert_eq!(
            ctx.store.delete_line(owner, line.uuid).await?,
            1,
            "owner deletes the line"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn delete_all_lines_and_save_cart_reset_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = ctx.store.create_cart(user).await?;

        ctx.store.upsert_line(new_line(cart.uuid, ProductUuid::new(), 2, 500)).await?;
        ctx.store.upsert_line(new_line(cart.uuid, ProductUuid::new(), 1, 250)).await?;
        ctx.store.save_cart(cart.uuid, 1_250).await?;

        let removed = ctx.store.delete_all_lines(cart.uuid).await?;
        ctx.store.save_cart(cart.uuid, 0).await?;

        let loaded = ctx.store.find_cart_by_user(user).await?.ok_or("cart missing")?;

        assert_eq!(removed, 2, "both lines removed");
        assert!(loaded.lines.is_empty(), "cart has no lines");
        assert_eq!(loaded.total, 0, "total reset");
        assert_eq!(loaded.uuid, cart.uuid, "cart record itself survives");

        Ok(())
    }
}
