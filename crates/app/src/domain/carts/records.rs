//! Cart Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::products::records::{ProductRecord, ProductUuid, VendorUuid},
    users::UserUuid,
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Cart Record
///
/// One per user. `total` is derived from the lines and rewritten on every
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Cart identifier.
    pub uuid: CartUuid,

    /// Owner of the cart.
    pub user_uuid: UserUuid,

    /// Sum of line totals.
    pub total: u64,

    /// Lines in insertion order.
    pub lines: Vec<CartLineRecord>,

    /// When the cart was first created.
    pub created_at: Timestamp,

    /// When the cart total last changed.
    pub updated_at: Timestamp,
}

impl CartRecord {
    /// A freshly created cart with no lines.
    #[must_use]
    pub fn empty(uuid: CartUuid, user_uuid: UserUuid) -> Self {
        let now = Timestamp::now();

        Self {
            uuid,
            user_uuid,
            total: 0,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn line_for_product_mut(
        &mut self,
        product: ProductUuid,
    ) -> Option<&mut CartLineRecord> {
        self.lines
            .iter_mut()
            .find(|line| line.product_uuid == product)
    }
}

/// Cart Line Record
///
/// `price` is the unit price captured when the product was last added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRecord {
    /// Line identifier.
    pub uuid: CartLineUuid,

    /// Cart the line belongs to.
    pub cart_uuid: CartUuid,

    /// Product on this line; unique within a cart.
    pub product_uuid: ProductUuid,

    /// Vendor selling the product.
    pub vendor_uuid: VendorUuid,

    /// Units of the product, at most [`MAX_LINE_QUANTITY`](crate::domain::carts::pricing::MAX_LINE_QUANTITY).
    pub quantity: u32,

    /// Unit price in minor units.
    pub price: u64,

    /// `price * quantity`.
    pub total: u64,

    /// When the line was first added.
    pub created_at: Timestamp,

    /// When the line last changed.
    pub updated_at: Timestamp,
}

/// A cart as returned to callers: lines joined with their current product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Cart identifier.
    pub uuid: CartUuid,

    /// Owner of the cart.
    pub user_uuid: UserUuid,

    /// Lines whose product could be loaded.
    pub lines: Vec<CartSnapshotLine>,

    /// Stored cart total, including skipped lines.
    pub total: u64,

    /// Lines left out because their product could not be loaded.
    pub skipped_lines: usize,
}

/// A cart line with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshotLine {
    /// The stored line.
    pub line: CartLineRecord,

    /// The product as it is now.
    pub product: ProductRecord,
}
