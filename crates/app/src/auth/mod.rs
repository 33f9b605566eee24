//! Authentication
//!
//! Bearer tokens resolve to the user whose cart a request operates on.

mod errors;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use service::*;
pub use token::*;
