//! Liveness endpoint for load balancers.

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Liveness report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests
    pub status: String,

    /// Name of the running service
    pub service: String,

    /// Build version of the running service
    pub version: String,
}

impl HealthResponse {
    fn current() -> Self {
        Self {
            status: "ok".to_string(),
            service: "dishpatch".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Report that the API is up, along with its build version.
#[endpoint(tags("health"), summary = "Liveness check")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}
