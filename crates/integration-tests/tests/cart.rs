//! Integration tests for the cart API.

use dewdrop_integration_tests::{TestContext, cart_item, cents, price};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn line<'a>(cart: &'a Value, id: &str) -> Option<&'a Value> {
    cart["items"]
        .as_array()
        .and_then(|items| items.iter().find(|item| item["id"] == id))
}

#[tokio::test]
async fn test_new_shopper_has_empty_closed_cart() {
    let ctx = TestContext::new().await;

    let cart = ctx.get_json("/cart").await;

    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["isOpen"], false);
    assert_eq!(cart["totals"]["itemCount"], 0);
    assert_eq!(price(&cart["totals"]["subtotal"]), cents(0));
}

#[tokio::test]
async fn test_add_same_product_twice_increments_quantity() {
    let ctx = TestContext::new().await;

    ctx.add_to_cart(&cart_item("1", "24.99", None)).await;
    let cart = ctx.add_to_cart(&cart_item("1", "24.99", None)).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    let serum = line(&cart, "1").expect("line for product 1");
    assert_eq!(serum["quantity"], 2);
    assert_eq!(price(&serum["lineTotal"]), cents(4998));
    assert_eq!(cart["totals"]["itemCount"], 2);
    assert_eq!(price(&cart["totals"]["subtotal"]), cents(4998));
}

#[tokio::test]
async fn test_subtotal_uses_discounted_price() {
    let ctx = TestContext::new().await;

    ctx.add_to_cart(&cart_item("1", "24.99", None)).await;
    let cart = ctx
        .add_to_cart(&cart_item("2", "49.99", Some("39.99")))
        .await;

    assert_eq!(price(&cart["totals"]["subtotal"]), cents(6498));
    let discounted = line(&cart, "2").expect("line for product 2");
    assert_eq!(price(&discounted["lineListTotal"]), cents(4999));
}

#[tokio::test]
async fn test_shipping_is_free_from_threshold() {
    let ctx = TestContext::new().await;

    let cart = ctx.add_to_cart(&cart_item("1", "24.99", None)).await;
    assert_eq!(price(&cart["totals"]["shipping"]), cents(500));
    assert_eq!(price(&cart["totals"]["total"]), cents(2999));
    assert_eq!(
        price(&cart["totals"]["amountUntilFreeShipping"]),
        cents(2501)
    );

    let cart = ctx.add_to_cart(&cart_item("2", "25.01", None)).await;
    assert_eq!(price(&cart["totals"]["subtotal"]), cents(5000));
    assert_eq!(price(&cart["totals"]["shipping"]), cents(0));
    assert_eq!(price(&cart["totals"]["total"]), cents(5000));
}

#[tokio::test]
async fn test_update_quantity_and_remove() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(&cart_item("1", "24.99", None)).await;
    ctx.add_to_cart(&cart_item("2", "39.99", None)).await;

    let resp = ctx
        .client
        .patch(ctx.url("/cart/items/1"))
        .json(&json!({ "quantity": 3 }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(line(&cart, "1").map(|l| l["quantity"].clone()), Some(json!(3)));

    let resp = ctx
        .client
        .delete(ctx.url("/cart/items/2"))
        .send()
        .await
        .expect("Request failed");
    let cart: Value = resp.json().await.expect("Invalid JSON");
    assert!(line(&cart, "2").is_none());
    assert_eq!(cart["totals"]["itemCount"], 3);
}

#[tokio::test]
async fn test_quantity_zero_removes_line() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(&cart_item("1", "24.99", None)).await;

    let cart: Value = ctx
        .client
        .patch(ctx.url("/cart/items/1"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");

    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn test_unknown_ids_are_ignored() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(&cart_item("1", "24.99", None)).await;

    let resp = ctx
        .client
        .delete(ctx.url("/cart/items/missing"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = ctx.get_json("/cart").await;
    assert_eq!(cart["totals"]["itemCount"], 1);
}

#[tokio::test]
async fn test_invalid_candidate_is_rejected() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/items"))
        .json(&cart_item("1", "0", None))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cart = ctx.get_json("/cart").await;
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn test_negative_discount_is_rejected() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/items"))
        .json(&cart_item("1", "24.99", Some("-100.00")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cart = ctx.get_json("/cart").await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(price(&cart["totals"]["subtotal"]), cents(0));
}

#[tokio::test]
async fn test_open_flag_toggles() {
    let ctx = TestContext::new().await;

    let cart: Value = ctx
        .client
        .put(ctx.url("/cart/open"))
        .json(&json!({ "open": true }))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(cart["isOpen"], true);

    let cart = ctx.get_json("/cart").await;
    assert_eq!(cart["isOpen"], true);
}
