//! Carts service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, instrument, warn};

use crate::{
    domain::{
        carts::{
            cache::{CartCache, DEFAULT_CART_CACHE_TTL},
            errors::{CartsServiceError, Conflict, Missing},
            locks::UserWriteLocks,
            pricing::{MAX_LINE_QUANTITY, cart_total, line_total},
            records::{CartLineRecord, CartLineUuid, CartRecord, CartSnapshot, CartSnapshotLine},
            store::CartStore,
        },
        products::{ProductCatalog, ProductsServiceError, records::ProductUuid},
    },
    users::UserUuid,
};

/// Cart operations backed by a [`CartStore`] with a write-invalidated
/// [`CartCache`] in front of reads.
#[derive(Clone)]
pub struct CachedCartsService {
    store: Arc<dyn CartStore>,
    cache: Arc<dyn CartCache>,
    catalog: Arc<dyn ProductCatalog>,
    cache_ttl: Duration,
    write_locks: Option<Arc<UserWriteLocks>>,
}

impl CachedCartsService {
    /// Build a service with the default cache TTL and unserialized writes.
    #[must_use]
    pub fn new(
        store: Arc<dyn CartStore>,
        cache: Arc<dyn CartCache>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Self {
        Self {
            store,
            cache,
            catalog,
            cache_ttl: DEFAULT_CART_CACHE_TTL,
            write_locks: None,
        }
    }

    /// Override how long cached carts live.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Hold a per-user lock around every mutation so concurrent writes to the
    /// same cart apply one after another. Without it concurrent adds are
    /// last-writer-wins.
    #[must_use]
    pub fn with_serialized_writes(mut self) -> Self {
        self.write_locks = Some(Arc::new(UserWriteLocks::new()));
        self
    }

    async fn lock_writes(&self, user: UserUuid) -> Option<OwnedMutexGuard<()>> {
        match &self.write_locks {
            Some(locks) => Some(locks.lock(user).await),
            None => None,
        }
    }

    async fn load_or_create(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        match self.store.find_cart_by_user(user).await? {
            Some(cart) => Ok(cart),
            None => Ok(self.store.create_cart(user).await?),
        }
    }

    async fn cached_cart(&self, user: UserUuid) -> Option<CartRecord> {
        match self.cache.get(user).await {
            Ok(Some(cart)) => {
                debug!(user_uuid = %user, "cart cache hit");
                Some(cart)
            }
            Ok(None) => {
                debug!(user_uuid = %user, "cart cache miss");
                None
            }
            Err(source) => {
                warn!(user_uuid = %user, "cart cache read failed, falling back to store: {source}");
                None
            }
        }
    }

    async fn cache_cart(&self, user: UserUuid, cart: &CartRecord) {
        if let Err(source) = self.cache.set(user, cart, self.cache_ttl).await {
            warn!(user_uuid = %user, "failed to cache cart: {source}");
        }
    }

    async fn invalidate(&self, user: UserUuid) {
        if let Err(source) = self.cache.delete(user).await {
            warn!(user_uuid = %user, "failed to invalidate cached cart: {source}");
        }
    }

    /// Rewrite the stored total from the lines currently in the store.
    async fn refresh_total(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        if let Some(cart) = self.store.find_cart_by_user(user).await? {
            let total = cart_total(&cart.lines).ok_or(CartsServiceError::AmountOverflow)?;

            self.store.save_cart(cart.uuid, total).await?;
        }

        Ok(())
    }

    async fn snapshot(&self, cart: &CartRecord) -> Result<CartSnapshot, CartsServiceError> {
        let mut lines = Vec::with_capacity(cart.lines.len());
        let mut skipped_lines = 0;

        for line in &cart.lines {
            match self.catalog.get_product(line.product_uuid).await {
                Ok(product) => lines.push(CartSnapshotLine {
                    line: line.clone(),
                    product,
                }),
                Err(ProductsServiceError::NotFound) => {
                    debug!(line_uuid = %line.uuid, product_uuid = %line.product_uuid, "skipping cart line for missing product");
                    skipped_lines += 1;
                }
                Err(source) => {
                    warn!(line_uuid = %line.uuid, product_uuid = %line.product_uuid, "skipping cart line, product lookup failed: {source}");
                    skipped_lines += 1;
                }
            }
        }

        let total = cart_total(lines.iter().map(|entry| &entry.line))
            .ok_or(CartsServiceError::AmountOverflow)?;

        Ok(CartSnapshot {
            uuid: cart.uuid,
            user_uuid: cart.user_uuid,
            lines,
            total,
            skipped_lines,
        })
    }
}

impl Debug for CachedCartsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CachedCartsService")
            .field("cache_ttl", &self.cache_ttl)
            .field("serialized_writes", &self.write_locks.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for CachedCartsService {
    #[instrument(name = "carts.get", skip(self), fields(user_uuid = %user))]
    async fn get_cart(&self, user: UserUuid) -> Result<CartSnapshot, CartsServiceError> {
        let cart = match self.cached_cart(user).await {
            Some(cart) => cart,
            None => self.load_or_create(user).await?,
        };

        let snapshot = self.snapshot(&cart).await?;

        self.cache_cart(user, &cart).await;

        Ok(snapshot)
    }

    #[instrument(name = "carts.add_item", skip(self), fields(user_uuid = %user, product_uuid = %product))]
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartSnapshot, CartsServiceError> {
        if quantity == 0 || quantity > MAX_LINE_QUANTITY {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let product = self.catalog.get_product(product).await?;

        if !product.is_active {
            return Err(Conflict::ProductUnavailable.into());
        }

        if !product.has_stock_for(quantity) {
            return Err(Conflict::InsufficientStock {
                requested: quantity,
                available: product.stock,
            }
            .into());
        }

        let guard = self.lock_writes(user).await;

        let mut cart = self.load_or_create(user).await?;
        let price = product.unit_price();

        let line = if let Some(line) = cart.line_for_product_mut(product.uuid) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .filter(|merged| *merged <= MAX_LINE_QUANTITY)
                .ok_or(CartsServiceError::AmountOverflow)?;
            line.price = price;
            line.total =
                line_total(price, line.quantity).ok_or(CartsServiceError::AmountOverflow)?;

            line.clone()
        } else {
            let now = Timestamp::now();
            let line = CartLineRecord {
                uuid: CartLineUuid::new(),
                cart_uuid: cart.uuid,
                product_uuid: product.uuid,
                vendor_uuid: product.vendor_uuid,
                quantity,
                price,
                total: line_total(price, quantity).ok_or(CartsServiceError::AmountOverflow)?,
                created_at: now,
                updated_at: now,
            };

            cart.lines.push(line.clone());

            line
        };

        let total = cart_total(&cart.lines).ok_or(CartsServiceError::AmountOverflow)?;

        self.store.upsert_line(line).await?;
        self.store.save_cart(cart.uuid, total).await?;
        self.invalidate(user).await;

        drop(guard);

        self.get_cart(user).await
    }

    #[instrument(name = "carts.update_item", skip(self), fields(user_uuid = %user, line_uuid = %line))]
    async fn update_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartSnapshot, CartsServiceError> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let guard = self.lock_writes(user).await;

        let mut existing = self
            .store
            .find_line(user, line)
            .await?
            .ok_or(CartsServiceError::NotFound(Missing::Line))?;

        if quantity == 0 {
            self.store.delete_line(user, line).await?;
        } else {
            existing.quantity = quantity;
            existing.total =
                line_total(existing.price, quantity).ok_or(CartsServiceError::AmountOverflow)?;

            self.store.upsert_line(existing).await?;
        }

        self.refresh_total(user).await?;
        self.invalidate(user).await;

        drop(guard);

        self.get_cart(user).await
    }

    #[instrument(name = "carts.remove_item", skip(self), fields(user_uuid = %user, line_uuid = %line))]
    async fn remove_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
    ) -> Result<CartSnapshot, CartsServiceError> {
        let guard = self.lock_writes(user).await;

        let removed = self.store.delete_line(user, line).await?;

        if removed > 0 {
            self.refresh_total(user).await?;
        } else {
            debug!("no matching line to remove");
        }

        self.invalidate(user).await;

        drop(guard);

        self.get_cart(user).await
    }

    #[instrument(name = "carts.clear", skip(self), fields(user_uuid = %user))]
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let _guard = self.lock_writes(user).await;

        let cart = self
            .store
            .find_cart_by_user(user)
            .await?
            .ok_or(CartsServiceError::NotFound(Missing::Cart))?;

        self.store.delete_all_lines(cart.uuid).await?;
        self.store.save_cart(cart.uuid, 0).await?;
        self.invalidate(user).await;

        Ok(())
    }
}

/// Cart operations for a single user.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Return the user's cart, creating an empty one on first access. Lines
    /// whose product can no longer be loaded are left out and counted in
    /// [`CartSnapshot::skipped_lines`].
    async fn get_cart(&self, user: UserUuid) -> Result<CartSnapshot, CartsServiceError>;

    /// Add `quantity` of a product, merging into an existing line for the same
    /// product and re-pricing it from the catalog.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartSnapshot, CartsServiceError>;

    /// Set a line's quantity at its stored price. Zero removes the line.
    async fn update_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartSnapshot, CartsServiceError>;

    /// Remove a line. Removing a line the user does not own is a no-op.
    async fn remove_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
    ) -> Result<CartSnapshot, CartsServiceError>;

    /// Empty the user's cart.
    ///
    /// Unlike the other operations this does not create a cart: it fails with
    /// [`Missing::Cart`] if the user has never had one.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
