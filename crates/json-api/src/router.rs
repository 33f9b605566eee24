//! App Router

use salvo::Router;

use crate::{auth, carts, healthcheck, observability};

/// Public routes plus the authenticated cart API.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(carts_router())
}

/// Cart routes behind bearer authentication.
pub(crate) fn carts_router() -> Router {
    Router::with_path("cart")
        .hoop(auth::middleware::handler)
        .get(carts::handlers::get::handler)
        .delete(carts::handlers::clear::handler)
        .push(
            Router::with_path("items")
                .post(carts::items::handlers::create::handler)
                .push(
                    Router::with_path("{line}")
                        .put(carts::items::handlers::update::handler)
                        .delete(carts::items::handlers::delete::handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use dishpatch_app::auth::{AuthServiceError, MockAuthService};
    use salvo::{
        affix_state::inject,
        http::{StatusCode, header::AUTHORIZATION},
        prelude::*,
        test::TestClient,
    };
    use testresult::TestResult;

    use crate::test_helpers::state_with_auth;

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(state_with_auth(auth)))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn healthcheck_does_not_require_auth() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com/healthcheck")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn cart_routes_require_auth() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let service = make_service(auth);

        let get = TestClient::get("http://example.com/cart").send(&service).await;
        let clear = TestClient::delete("http://example.com/cart").send(&service).await;
        let add = TestClient::post("http://example.com/cart/items")
            .send(&service)
            .await;

        assert_eq!(get.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(clear.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(add.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_never_reaches_the_cart_service() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com/cart")
            .add_header(AUTHORIZATION, "Bearer dp_bogus.token", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
