//! Cart endpoints
//!
//! Every route operates on the cart of the authenticated user.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod items;
