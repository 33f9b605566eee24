//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
///
/// Removes every item from the authenticated user's cart.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.clear",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    state
        .app
        .carts
        .clear_cart(user)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %user, "cleared cart");

    Ok(StatusCode::OK)
}
