//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dishpatch_app::domain::carts::records::CartLineUuid;

use crate::{
    carts::{errors::into_status_error, handlers::get::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity; 0 removes the item, values beyond what a line can hold are rejected
    pub quantity: u32,
}

/// Update Cart Item Handler
///
/// Sets an item's quantity at its stored price.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(line, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        line_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let line = line.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("line_uuid", tracing::field::display(line));

    let cart = state
        .app
        .carts
        .update_item(user, CartLineUuid::from_uuid(line), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use dishpatch_app::domain::carts::{CartsServiceError, MockCartsService, Missing};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_snapshot};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/items/{line}").put(handler))
    }

    #[tokio::test]
    async fn test_update_item_forwards_line_and_quantity() -> TestResult {
        let line = Uuid::now_v7();
        let snapshot = make_snapshot(TEST_USER_UUID, 3, 500);

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .withf(move |user, l, quantity| {
                *user == TEST_USER_UUID && l.into_uuid() == line && *quantity == 3
            })
            .return_once(move |_, _, _| Ok(snapshot));

        let res = TestClient::put(format!("http://example.com/cart/items/{line}"))
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_foreign_line_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound(Missing::Line)));

        let res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_oversized_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .withf(|_, _, quantity| *quantity == 3_000_000_000)
            .return_once(|_, _, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 3_000_000_000_u32 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_invalid_line_uuid_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_update_item().never();

        let res = TestClient::put("http://example.com/cart/items/123")
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
