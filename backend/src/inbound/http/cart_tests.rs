//! Handler coverage for the cart routes.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockCartCommand, MockCartQuery, Storage};
use crate::domain::{NewProduct, Product};
use crate::inbound::http::configure_api;
use crate::inbound::http::test_utils::{memory_state, session_cookie, test_session_middleware};
use crate::outbound::InMemoryStorage;

fn brake_disc(stock: u32) -> NewProduct {
    NewProduct {
        name: "Disco Freno Anteriore Destro MT-09".to_owned(),
        part_number: "1RC-2582W-00".to_owned(),
        description: "Disco freno flottante 298mm".to_owned(),
        category: "brakes".to_owned(),
        price: Decimal::new(17_800, 2),
        stock,
        image_url: None,
        compatible_models: vec!["MT-09 2014-2023".to_owned()],
    }
}

macro_rules! storefront_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new($state))
                .service(web::scope("/api").configure(configure_api)),
        )
        .await
    };
}

macro_rules! sign_in {
    ($app:expr) => {{
        let res = actix_test::call_service(
            &$app,
            actix_test::TestRequest::get().uri("/api/login").to_request(),
        )
        .await;
        session_cookie(&res).expect("session cookie")
    }};
}

async fn seeded(stock: u32) -> (HttpState, Arc<InMemoryStorage>, Product) {
    let (state, storage) = memory_state();
    let product = storage
        .create_product(&brake_disc(stock))
        .await
        .expect("seed product");
    (state, storage, product)
}

fn post_cart(cookie: Cookie<'static>, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/cart")
        .cookie(cookie)
        .set_json(body)
}

#[actix_web::test]
async fn adding_twice_merges_quantities() {
    let (state, _, product) = seeded(10).await;
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    for quantity in [2, 3] {
        let res = actix_test::call_service(
            &app,
            post_cart(
                cookie.clone(),
                json!({"productId": product.id, "quantity": quantity}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/cart")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let items: Vec<Value> = actix_test::read_body_json(res).await;
    assert_eq!(items.len(), 1);
    let line = items.first().expect("one line");
    assert_eq!(line.get("quantity").and_then(Value::as_u64), Some(5));
    assert_eq!(
        line.pointer("/product/partNumber").and_then(Value::as_str),
        Some("1RC-2582W-00")
    );
}

#[rstest]
#[case(json!({"quantity": 1}), "productId")]
#[case(json!({"productId": "", "quantity": 1}), "productId")]
#[case(json!({"productId": "6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10"}), "quantity")]
#[case(json!({"productId": "6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10", "quantity": 0}), "quantity")]
#[case(json!({"productId": "6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10", "quantity": -2}), "quantity")]
#[actix_web::test]
async fn invalid_add_bodies_are_rejected(#[case] body: Value, #[case] field: &str) {
    let (state, _) = memory_state();
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let res = actix_test::call_service(&app, post_cart(cookie, body).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some(INVALID_REQUEST_DATA)
    );
    assert_eq!(
        payload.pointer("/details/field").and_then(Value::as_str),
        Some(field)
    );
}

#[actix_web::test]
async fn fractional_quantities_fail_body_parsing() {
    let (state, _, product) = seeded(10).await;
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let res = actix_test::call_service(
        &app,
        post_cart(cookie, json!({"productId": product.id, "quantity": 1.5})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        payload.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
}

#[rstest]
#[case(5, 6, StatusCode::BAD_REQUEST)]
#[case(5, 5, StatusCode::CREATED)]
#[case(0, 1, StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn quantity_is_bounded_by_stock(
    #[case] stock: u32,
    #[case] requested: i64,
    #[case] expected: StatusCode,
) {
    let (state, _, product) = seeded(stock).await;
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let res = actix_test::call_service(
        &app,
        post_cart(cookie, json!({"productId": product.id, "quantity": requested})).to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
    if expected == StatusCode::BAD_REQUEST {
        let payload: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            payload.get("message").and_then(Value::as_str),
            Some("Insufficient stock")
        );
    }
}

#[actix_web::test]
async fn stock_check_ignores_quantity_already_in_cart() {
    let (state, _, product) = seeded(5).await;
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    for _ in 0..2 {
        let res = actix_test::call_service(
            &app,
            post_cart(cookie.clone(), json!({"productId": product.id, "quantity": 3}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/cart")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let items: Vec<Value> = actix_test::read_body_json(res).await;
    assert_eq!(items.len(), 1);
    let line = items.first().expect("one line");
    assert_eq!(line.get("quantity").and_then(Value::as_u64), Some(6));
}

#[rstest]
#[case("not-a-uuid")]
#[case("6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10")]
#[actix_web::test]
async fn unknown_products_cannot_be_added(#[case] product_id: &str) {
    let (state, _) = memory_state();
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let res = actix_test::call_service(
        &app,
        post_cart(cookie, json!({"productId": product_id, "quantity": 1})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some(PRODUCT_NOT_FOUND)
    );
}

#[actix_web::test]
async fn patch_sets_quantity_without_a_stock_check() {
    let (state, _, product) = seeded(2).await;
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let created = actix_test::call_service(
        &app,
        post_cart(cookie.clone(), json!({"productId": product.id, "quantity": 1})).to_request(),
    )
    .await;
    let item: Value = actix_test::read_body_json(created).await;
    let id = item.get("id").and_then(Value::as_str).expect("item id");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/cart/{id}"))
            .cookie(cookie)
            .set_json(json!({"quantity": 50}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = actix_test::read_body_json(res).await;
    assert_eq!(updated.get("quantity").and_then(Value::as_u64), Some(50));
}

#[rstest]
#[case(json!({}))]
#[case(json!({"quantity": 0}))]
#[actix_web::test]
async fn patch_rejects_invalid_quantities(#[case] body: Value) {
    let (state, _) = memory_state();
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/cart/6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some(INVALID_QUANTITY)
    );
}

#[rstest]
#[case("not-a-uuid")]
#[case("6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10")]
#[actix_web::test]
async fn patch_of_unknown_items_is_not_found(#[case] id: &str) {
    let (state, _) = memory_state();
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/cart/{id}"))
            .cookie(cookie)
            .set_json(json!({"quantity": 2}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("not-a-uuid")]
#[case("6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10")]
#[actix_web::test]
async fn delete_is_idempotent(#[case] id: &str) {
    let (state, _) = memory_state();
    let app = storefront_app!(state);
    let cookie = sign_in!(app);

    for _ in 0..2 {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/cart/{id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}

/// Gated routes must fail before any port is consulted.
#[rstest]
#[case(actix_test::TestRequest::get().uri("/api/cart"))]
#[case(actix_test::TestRequest::post().uri("/api/cart").set_json(json!({"productId": "x", "quantity": 1})))]
#[case(actix_test::TestRequest::patch().uri("/api/cart/x").set_json(json!({"quantity": 1})))]
#[case(actix_test::TestRequest::delete().uri("/api/cart/x"))]
#[case(actix_test::TestRequest::post().uri("/api/cart").set_json(json!({"productId": "x", "quantity": "two"})))]
#[case(actix_test::TestRequest::post().uri("/api/cart").set_json(json!({"quantity": 1.5})))]
#[case(actix_test::TestRequest::patch().uri("/api/cart/x").set_json(json!({"quantity": "abc"})))]
#[case(actix_test::TestRequest::post().uri("/api/cart").insert_header(("content-type", "application/json")).set_payload("{not json"))]
#[actix_web::test]
async fn anonymous_requests_are_unauthorised(#[case] request: actix_test::TestRequest) {
    let (mut state, _) = memory_state();
    let mut cart = MockCartCommand::new();
    cart.expect_add_item().times(0);
    cart.expect_update_quantity().times(0);
    cart.expect_remove_item().times(0);
    let mut cart_query = MockCartQuery::new();
    cart_query.expect_list_items().times(0);
    state.cart = Arc::new(cart);
    state.cart_query = Arc::new(cart_query);
    let app = storefront_app!(state);

    let res = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some("login required")
    );
}
