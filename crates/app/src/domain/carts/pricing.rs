//! Cart pricing
//!
//! All arithmetic is checked; an overflow is reported instead of wrapping.

use crate::domain::carts::records::CartLineRecord;

/// Largest quantity a single cart line can hold; line quantities are stored
/// as `INTEGER`.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// `price * quantity`, or `None` on overflow.
#[must_use]
pub fn line_total(price: u64, quantity: u32) -> Option<u64> {
    price.checked_mul(u64::from(quantity))
}

/// Sum of line totals, or `None` on overflow.
#[must_use]
pub fn cart_total<'a, I>(lines: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a CartLineRecord>,
{
    lines
        .into_iter()
        .try_fold(0_u64, |total, line| total.checked_add(line.total))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::domain::{
        carts::records::{CartLineUuid, CartUuid},
        products::records::{ProductUuid, VendorUuid},
    };

    fn line(price: u64, quantity: u32) -> CartLineRecord {
        CartLineRecord {
            uuid: CartLineUuid::new(),
            cart_uuid: CartUuid::new(),
            product_uuid: ProductUuid::new(),
            vendor_uuid: VendorUuid::new(),
            quantity,
            price,
            total: price * u64::from(quantity),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(line_total(500, 2), Some(1_000), "2 x 5.00 should be 10.00");
    }

    #[test]
    fn line_total_reports_overflow() {
        assert_eq!(line_total(u64::MAX, 2), None, "overflow should not wrap");
    }

    #[test]
    fn cart_total_sums_lines() {
        let lines = [line(500, 2), line(250, 3), line(1_999, 1)];

        assert_eq!(cart_total(&lines), Some(3_749), "should sum every line total");
    }

    #[test]
    fn cart_total_of_no_lines_is_zero() {
        let lines: [CartLineRecord; 0] = [];

        assert_eq!(cart_total(&lines), Some(0), "empty cart totals zero");
    }
}
