//! Cart, catalog and auth services shared by the Dishpatch binaries.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod users;

#[cfg(test)]
mod test;

pub mod uuids;
