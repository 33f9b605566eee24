//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use dishpatch_app::domain::carts::records::CartLineUuid;

use crate::{
    carts::{errors::into_status_error, handlers::get::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing an item that is not in the cart leaves the cart unchanged.
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.delete",
    skip(line, depot),
    fields(
        user_uuid = tracing::field::Empty,
        line_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
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
        .remove_item(user, CartLineUuid::from_uuid(line))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
