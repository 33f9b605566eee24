//! Users
//!
//! Accounts are managed by the authentication service. Carts only need the
//! identifier.

use crate::uuids::TypedUuid;

/// Marker for user identifiers.
#[derive(Debug)]
pub struct UserRecord;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;
