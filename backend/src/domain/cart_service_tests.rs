//! Tests for cart service validation rules.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::*;
use crate::domain::ports::{MockStorage, StorageError};
use crate::domain::{CartItemId, ErrorCode, Product, ProductId, Quantity};

#[fixture]
fn rider() -> UserId {
    UserId::new("rider-1").expect("valid id")
}

fn product_with_stock(stock: u32) -> Product {
    Product {
        id: ProductId::random(),
        name: "Disco Freno Anteriore Destro MT-09".to_owned(),
        part_number: "1RC-2582W-00".to_owned(),
        description: "Disco freno flottante".to_owned(),
        category: "brakes".to_owned(),
        price: Decimal::new(17_800, 2),
        stock,
        image_url: None,
        compatible_models: vec!["MT-09 2014-2023".to_owned()],
        created_at: Utc::now(),
    }
}

fn item_for(user_id: &UserId, product_id: ProductId, quantity: u32) -> CartItem {
    CartItem {
        id: CartItemId::random(),
        user_id: user_id.clone(),
        product_id,
        quantity,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn quantity(value: i64) -> Quantity {
    Quantity::new(value).expect("valid quantity")
}

#[rstest]
#[tokio::test]
async fn add_item_merges_when_stock_allows(rider: UserId) {
    let product = product_with_stock(6);
    let product_id = product.id;
    let merged = item_for(&rider, product_id, 4);
    let expected = merged.clone();

    let mut storage = MockStorage::new();
    storage
        .expect_get_product_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(product)));
    storage
        .expect_add_cart_item()
        .withf(move |_, id, qty| *id == product_id && qty.get() == 2)
        .times(1)
        .return_once(move |_, _, _| Ok(merged));

    let service = CartService::new(Arc::new(storage));
    let item = service
        .add_item(AddCartItemRequest {
            user_id: rider,
            product_id,
            quantity: quantity(2),
        })
        .await
        .expect("add succeeds");

    assert_eq!(item, expected);
}

#[rstest]
#[tokio::test]
async fn add_item_rejects_missing_product(rider: UserId) {
    let mut storage = MockStorage::new();
    storage
        .expect_get_product_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    storage.expect_add_cart_item().times(0);

    let service = CartService::new(Arc::new(storage));
    let error = service
        .add_item(AddCartItemRequest {
            user_id: rider,
            product_id: ProductId::random(),
            quantity: Quantity::one(),
        })
        .await
        .expect_err("missing product");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), PRODUCT_NOT_FOUND);
}

#[rstest]
#[case(5, 6)]
#[case(0, 1)]
#[tokio::test]
async fn add_item_rejects_quantities_above_stock(
    rider: UserId,
    #[case] stock: u32,
    #[case] requested: i64,
) {
    let product = product_with_stock(stock);
    let product_id = product.id;
    let mut storage = MockStorage::new();
    storage
        .expect_get_product_by_id()
        .return_once(move |_| Ok(Some(product)));
    storage.expect_add_cart_item().times(0);

    let service = CartService::new(Arc::new(storage));
    let error = service
        .add_item(AddCartItemRequest {
            user_id: rider,
            product_id,
            quantity: quantity(requested),
        })
        .await
        .expect_err("insufficient stock");

    assert_eq!(error.code(), ErrorCode::InsufficientStock);
    assert_eq!(error.message(), INSUFFICIENT_STOCK);
}

#[rstest]
#[tokio::test]
async fn add_item_allows_exact_stock(rider: UserId) {
    let product = product_with_stock(3);
    let product_id = product.id;
    let stored = item_for(&rider, product_id, 3);
    let mut storage = MockStorage::new();
    storage
        .expect_get_product_by_id()
        .return_once(move |_| Ok(Some(product)));
    storage
        .expect_add_cart_item()
        .times(1)
        .return_once(move |_, _, _| Ok(stored));

    let service = CartService::new(Arc::new(storage));
    let item = service
        .add_item(AddCartItemRequest {
            user_id: rider,
            product_id,
            quantity: quantity(3),
        })
        .await
        .expect("exact stock accepted");
    assert_eq!(item.quantity, 3);
}

#[rstest]
#[tokio::test]
async fn add_item_maps_connection_failures(rider: UserId) {
    let mut storage = MockStorage::new();
    storage
        .expect_get_product_by_id()
        .return_once(|_| Err(StorageError::connection("pool exhausted")));

    let service = CartService::new(Arc::new(storage));
    let error = service
        .add_item(AddCartItemRequest {
            user_id: rider,
            product_id: ProductId::random(),
            quantity: Quantity::one(),
        })
        .await
        .expect_err("storage down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn update_quantity_ignores_stock(rider: UserId) {
    let existing = item_for(&rider, ProductId::random(), 1);
    let item_id = existing.id;
    let updated = CartItem {
        quantity: 500,
        ..existing.clone()
    };

    let mut storage = MockStorage::new();
    storage
        .expect_find_cart_item()
        .return_once(move |_| Ok(Some(existing)));
    storage.expect_get_product_by_id().times(0);
    storage
        .expect_update_cart_item_quantity()
        .withf(move |id, qty| *id == item_id && qty.get() == 500)
        .times(1)
        .return_once(move |_, _| Ok(updated));

    let service = CartService::new(Arc::new(storage));
    let item = service
        .update_quantity(UpdateCartItemRequest {
            user_id: rider,
            item_id,
            quantity: quantity(500),
        })
        .await
        .expect("update succeeds");
    assert_eq!(item.quantity, 500);
}

#[rstest]
#[tokio::test]
async fn update_quantity_hides_foreign_items(rider: UserId) {
    let stranger = UserId::new("rider-2").expect("valid id");
    let foreign = item_for(&stranger, ProductId::random(), 1);
    let item_id = foreign.id;

    let mut storage = MockStorage::new();
    storage
        .expect_find_cart_item()
        .return_once(move |_| Ok(Some(foreign)));
    storage.expect_update_cart_item_quantity().times(0);

    let service = CartService::new(Arc::new(storage));
    let error = service
        .update_quantity(UpdateCartItemRequest {
            user_id: rider,
            item_id,
            quantity: quantity(2),
        })
        .await
        .expect_err("foreign item");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), CART_ITEM_NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn remove_item_is_a_no_op_for_missing_items(rider: UserId) {
    let mut storage = MockStorage::new();
    storage.expect_find_cart_item().return_once(|_| Ok(None));
    storage.expect_delete_cart_item().times(0);

    let service = CartService::new(Arc::new(storage));
    service
        .remove_item(RemoveCartItemRequest {
            user_id: rider,
            item_id: CartItemId::random(),
        })
        .await
        .expect("idempotent delete");
}

#[rstest]
#[tokio::test]
async fn remove_item_deletes_owned_items(rider: UserId) {
    let owned = item_for(&rider, ProductId::random(), 2);
    let item_id = owned.id;
    let mut storage = MockStorage::new();
    storage
        .expect_find_cart_item()
        .return_once(move |_| Ok(Some(owned)));
    storage
        .expect_delete_cart_item()
        .withf(move |id| *id == item_id)
        .times(1)
        .return_once(|_| Ok(()));

    let service = CartService::new(Arc::new(storage));
    service
        .remove_item(RemoveCartItemRequest {
            user_id: rider,
            item_id,
        })
        .await
        .expect("delete succeeds");
}
