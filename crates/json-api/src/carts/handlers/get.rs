//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dishpatch_app::domain::{
    carts::records::{CartSnapshot, CartSnapshotLine},
    products::records::ProductRecord,
};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
///
/// Money values are integer minor units (e.g. cents).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// The user who owns the cart
    pub user_id: Uuid,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// Sum of the item totals
    pub total: u64,

    /// Items left out because their product is no longer available
    pub skipped_items: usize,
}

impl From<CartSnapshot> for CartResponse {
    fn from(cart: CartSnapshot) -> Self {
        Self {
            id: cart.uuid.into_uuid(),
            user_id: cart.user_uuid.into_uuid(),
            items: cart.lines.into_iter().map(CartItemResponse::from).collect(),
            total: cart.total,
            skipped_items: cart.skipped_lines,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub id: Uuid,

    /// The product in the cart item
    pub product_id: Uuid,

    /// Current catalog data for the product
    pub product: ProductResponse,

    /// The vendor selling the product
    pub vendor_id: Uuid,

    pub quantity: u32,

    /// Unit price captured when the product was last added
    pub price: u64,

    /// `price` multiplied by `quantity`
    pub total: u64,
}

impl From<CartSnapshotLine> for CartItemResponse {
    fn from(CartSnapshotLine { line, product }: CartSnapshotLine) -> Self {
        Self {
            id: line.uuid.into_uuid(),
            product_id: line.product_uuid.into_uuid(),
            product: product.into(),
            vendor_id: line.vendor_uuid.into_uuid(),
            quantity: line.quantity,
            price: line.price,
            total: line.total,
        }
    }
}

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub price: u64,
    pub discount_price: Option<u64>,
    pub stock: u32,
    pub is_active: bool,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            vendor_id: product.vendor_uuid.into_uuid(),
            name: product.name,
            price: product.price,
            discount_price: product.discount_price,
            stock: product.stock,
            is_active: product.is_active,
        }
    }
}

/// Get Cart Handler
///
/// Returns the authenticated user's cart, creating an empty one on first use.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The user's cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use dishpatch_app::domain::carts::{CartStoreError, CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_snapshot};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_cart() -> TestResult {
        let mut carts = MockCartsService::new();
        let snapshot = make_snapshot(TEST_USER_UUID, 2, 500);
        let expected_line = snapshot.lines.first().map(|l| l.line.uuid.into_uuid());

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(snapshot));

        carts.expect_add_item().never();
        carts.expect_update_item().never();
        carts.expect_remove_item().never();
        carts.expect_clear_cart().never();

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.user_id, TEST_USER_UUID.into_uuid());
        assert_eq!(body.total, 1_000);
        assert_eq!(body.skipped_items, 0);
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items.first().map(|item| item.id), expected_line);
        assert_eq!(body.items.first().map(|item| item.quantity), Some(2));
        assert_eq!(body.items.first().map(|item| item.price), Some(500));
        assert_eq!(body.items.first().map(|item| item.total), Some(1_000));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_storage_failure_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().once().return_once(|_| {
            Err(CartsServiceError::Storage(CartStoreError::Sql(
                sqlx::Error::PoolClosed,
            )))
        });

        carts.expect_clear_cart().never();

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
