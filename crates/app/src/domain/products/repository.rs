//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::{try_get_amount, try_get_count},
    domain::products::records::{ProductRecord, ProductUuid, VendorUuid},
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        pool: &PgPool,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_price = row
            .try_get::<Option<i64>, _>("discount_price")?
            .map(u64::try_from)
            .transpose()
            .map_err(|source| sqlx::Error::ColumnDecode {
                index: "discount_price".to_string(),
                source: Box::new(source),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            vendor_uuid: VendorUuid::from_uuid(row.try_get("vendor_uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            discount_price,
            stock: try_get_count(row, "stock")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
