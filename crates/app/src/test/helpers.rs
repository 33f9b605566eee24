//! Test Helpers

use jiff::Timestamp;

use crate::domain::products::records::{ProductRecord, ProductUuid, VendorUuid};

/// An active catalog product.
pub(crate) fn product(price: u64, discount_price: Option<u64>, stock: u32) -> ProductRecord {
    ProductRecord {
        uuid: ProductUuid::new(),
        vendor_uuid: VendorUuid::new(),
        name: "Green Curry".to_string(),
        price,
        discount_price,
        stock,
        is_active: true,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}
