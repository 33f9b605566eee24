//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use dishpatch_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartLineRecord, CartLineUuid, CartSnapshot, CartSnapshotLine, CartUuid},
        },
        products::records::{ProductRecord, ProductUuid, VendorUuid},
    },
    users::UserUuid,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();

    carts
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
        auth: Arc::new(strict_auth_mock()),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(strict_carts_mock()),
        auth: Arc::new(auth),
    })
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn make_empty_snapshot(user: UserUuid) -> CartSnapshot {
    CartSnapshot {
        uuid: CartUuid::new(),
        user_uuid: user,
        lines: Vec::new(),
        total: 0,
        skipped_lines: 0,
    }
}

/// A cart holding one line of `quantity` units at `price`.
pub(crate) fn make_snapshot(user: UserUuid, quantity: u32, price: u64) -> CartSnapshot {
    let cart = CartUuid::new();
    let total = price * u64::from(quantity);

    let product = ProductRecord {
        uuid: ProductUuid::new(),
        vendor_uuid: VendorUuid::new(),
        name: "Margherita".to_string(),
        price,
        discount_price: None,
        stock: 10,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    };

    let line = CartLineRecord {
        uuid: CartLineUuid::new(),
        cart_uuid: cart,
        product_uuid: product.uuid,
        vendor_uuid: product.vendor_uuid,
        quantity,
        price,
        total,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    };

    CartSnapshot {
        uuid: cart,
        user_uuid: user,
        lines: vec![CartSnapshotLine { line, product }],
        total,
        skipped_lines: 0,
    }
}
