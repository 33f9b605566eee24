//! Products
//!
//! The product catalog is owned by another service. Carts only ever read from
//! it to validate availability and snapshot prices.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
