//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dishpatch_app::domain::products::records::ProductUuid;

use crate::{
    carts::{errors::into_status_error, handlers::get::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// The product to add
    pub product_id: Uuid,

    /// How many units to add; at least 1 and no more than a line can hold
    pub quantity: u32,
}

/// Add Cart Item Handler
///
/// Adds units of a product to the cart, merging into an existing item for the
/// same product.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Product unavailable or insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.create",
    skip(json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(request.product_id));

    let cart = state
        .app
        .carts
        .add_item(
            user,
            ProductUuid::from_uuid(request.product_id),
            request.quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use dishpatch_app::domain::carts::{
        CartsServiceError, Conflict, MockCartsService, Missing,
    };

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_snapshot};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_returns_updated_cart() -> TestResult {
        let product = Uuid::now_v7();
        let snapshot = make_snapshot(TEST_USER_UUID, 2, 500);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |user, p, quantity| {
                *user == TEST_USER_UUID && p.into_uuid() == product && *quantity == 2
            })
            .return_once(move |_, _, _| Ok(snapshot));

        carts.expect_get_cart().never();

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_id": product, "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total, 1_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_id": Uuid::now_v7(), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_negative_quantity_is_rejected_before_the_service() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_id": Uuid::now_v7(), "quantity": -1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound(Missing::Product)));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_id": Uuid::now_v7(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_beyond_stock_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(|_, _, _| {
            Err(CartsServiceError::Conflict(Conflict::InsufficientStock {
                requested: 11,
                available: 10,
            }))
        });

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_id": Uuid::now_v7(), "quantity": 11 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
