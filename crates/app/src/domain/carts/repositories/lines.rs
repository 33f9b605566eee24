//! Cart Lines Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::{
        carts::records::{CartLineRecord, CartLineUuid, CartUuid},
        products::records::{ProductUuid, VendorUuid},
    },
    users::UserUuid,
};

use crate::database::{try_get_amount, try_get_count};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const FIND_LINE_SQL: &str = include_str!("../sql/find_line.sql");
const UPSERT_LINE_SQL: &str = include_str!("../sql/upsert_line.sql");
const DELETE_LINE_SQL: &str = include_str!("../sql/delete_line.sql");
const DELETE_ALL_LINES_SQL: &str = include_str!("../sql/delete_all_lines.sql");

/// Column values for an upsert, already range-checked for Postgres.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineRow {
    pub(crate) quantity: i32,
    pub(crate) price: i64,
    pub(crate) total: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        user: UserUuid,
    ) -> Result<Option<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(FIND_LINE_SQL)
            .bind(line.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert the line, or overwrite quantity and prices of the cart's
    /// existing line for the same product.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: &CartLineRecord,
        row: LineRow,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(UPSERT_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(line.cart_uuid.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(line.vendor_uuid.into_uuid())
            .bind(row.quantity)
            .bind(row.price)
            .bind(row.total)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LINE_SQL)
            .bind(line.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_all_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ALL_LINES_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            vendor_uuid: VendorUuid::from_uuid(row.try_get("vendor_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            price: try_get_amount(row, "price")?,
            total: try_get_amount(row, "total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
