//! Cart Repositories

mod carts;
mod lines;

pub(crate) use carts::PgCartsRepository;
pub(crate) use lines::{LineRow, PgCartLinesRepository};
