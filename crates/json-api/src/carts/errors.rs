//! Errors

use salvo::http::StatusError;
use tracing::error;

use dishpatch_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity | CartsServiceError::AmountOverflow => {
            StatusError::bad_request().brief(error.to_string())
        }
        CartsServiceError::NotFound(missing) => {
            StatusError::not_found().brief(format!("{missing} not found"))
        }
        CartsServiceError::Conflict(conflict) => StatusError::conflict().brief(conflict.to_string()),
        CartsServiceError::Storage(source) => {
            error!("cart storage failed: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Catalog(source) => {
            error!("product catalog failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
