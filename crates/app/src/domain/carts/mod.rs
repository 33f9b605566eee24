//! Carts
//!
//! Each user owns one cart. Postgres is the source of truth; a TTL cache sits
//! in front of reads and is invalidated by every write. Prices are snapshotted
//! onto lines when products are added.

pub mod cache;
pub mod errors;
mod locks;
pub mod pricing;
pub mod records;
mod repositories;
pub mod service;
pub mod store;

pub use cache::{CartCache, MemoryCartCache, RedisCartCache};
pub use errors::{CartCacheError, CartStoreError, CartsServiceError, Conflict, Missing};
pub use service::*;
pub use store::{CartStore, PgCartStore};
