//! Carts service errors.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::TryFromIntError,
};

use thiserror::Error;

use crate::domain::products::ProductsServiceError;

/// The entity a [`CartsServiceError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// The product being added.
    Product,

    /// The user's cart.
    Cart,

    /// A line of the user's cart.
    Line,
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Line => "cart line",
        })
    }
}

/// Business rules that reject an add before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    /// The product is inactive or deleted.
    #[error("product is not available")]
    ProductUnavailable,

    /// The product has fewer units than requested.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units asked for by this add.
        requested: u32,

        /// Units the product has in stock.
        available: u32,
    },
}

/// Errors returned by [`CartsService`](crate::domain::carts::CartsService).
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// Quantity out of range for the operation.
    #[error("quantity out of range")]
    InvalidQuantity,

    /// A line or cart total does not fit in a `u64`.
    #[error("amount out of range")]
    AmountOverflow,

    /// The referenced entity does not exist for this user.
    #[error("{0} not found")]
    NotFound(Missing),

    /// A business rule rejected the add.
    #[error(transparent)]
    Conflict(Conflict),

    /// The cart store failed.
    #[error("cart storage error")]
    Storage(#[from] CartStoreError),

    /// The product catalog failed.
    #[error("product catalog error")]
    Catalog(#[source] ProductsServiceError),
}

impl From<ProductsServiceError> for CartsServiceError {
    fn from(error: ProductsServiceError) -> Self {
        match error {
            ProductsServiceError::NotFound => Self::NotFound(Missing::Product),
            other => Self::Catalog(other),
        }
    }
}

impl From<Conflict> for CartsServiceError {
    fn from(conflict: Conflict) -> Self {
        Self::Conflict(conflict)
    }
}

/// Errors raised by a [`CartStore`](crate::domain::carts::CartStore) adapter.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Postgres failed.
    #[error("storage error")]
    Sql(#[from] sqlx::Error),

    /// A stored amount does not fit its column.
    #[error("invalid amount value")]
    InvalidAmount(#[from] TryFromIntError),
}

/// Errors raised by a [`CartCache`](crate::domain::carts::CartCache) adapter.
#[derive(Debug, Error)]
pub enum CartCacheError {
    /// Redis failed.
    #[error("cache backend error")]
    Redis(#[from] redis::RedisError),

    /// The cached payload is not a cart.
    #[error("cache payload could not be (de)serialized")]
    Serialization(#[from] serde_json::Error),
}
