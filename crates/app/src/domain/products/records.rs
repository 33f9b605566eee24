//! Product Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Vendor UUID
pub type VendorUuid = TypedUuid<VendorRecord>;

/// Vendors live in their own service; only the identifier is denormalized here.
#[derive(Debug)]
pub struct VendorRecord;

/// Product Record
///
/// Amounts are integer minor units (e.g. cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product identifier.
    pub uuid: ProductUuid,

    /// Vendor selling the product.
    pub vendor_uuid: VendorUuid,

    /// Display name.
    pub name: String,

    /// List price.
    pub price: u64,

    /// Charged instead of `price` when set.
    pub discount_price: Option<u64>,

    /// Units available to add.
    pub stock: u32,

    /// Inactive products cannot be added to a cart.
    pub is_active: bool,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last change to price or stock.
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// The price a cart line is charged: the discount price when one is set
    /// and positive, otherwise the list price.
    #[must_use]
    pub fn unit_price(&self) -> u64 {
        match self.discount_price {
            Some(discount) if discount > 0 => discount,
            _ => self.price,
        }
    }

    /// Whether `quantity` units can be taken from current stock.
    #[must_use]
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}
