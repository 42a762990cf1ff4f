//! API integration tests
//!
//! Scenarios exercise the booking/availability/inventory coordination
//! end to end against a running server.

use chrono::{Days, NaiveDate, Utc};
use reqwest::Client;
use serde_json::{json, Value};

use agrilink_server::models::UserClaims;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Mint a bearer token for the given user id. Issuance is normally the
/// auth gateway's job; the server only validates the shared secret.
fn token_for(user_id: i32) -> String {
    let secret =
        std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".into());
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: format!("user-{user_id}"),
        user_id,
        iat: now,
        exp: now + 3600,
    };
    claims.create_token(&secret).expect("Failed to create token")
}

fn day(offset: u64) -> NaiveDate {
    Utc::now().date_naive() + Days::new(offset)
}

async fn create_equipment(client: &Client, owner: i32, name: &str) -> i32 {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token_for(owner))
        .json(&json!({ "name": name, "category": "tractor", "daily_rate": 120.0 }))
        .send()
        .await
        .expect("Failed to create equipment");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse equipment");
    body["id"].as_i64().expect("No equipment id") as i32
}

async fn create_supply(client: &Client, supplier: i32, name: &str, quantity: i32) -> i32 {
    let response = client
        .post(format!("{}/supplies", BASE_URL))
        .bearer_auth(token_for(supplier))
        .json(&json!({ "name": name, "unit": "bag", "total_quantity": quantity }))
        .send()
        .await
        .expect("Failed to create supply");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse supply");
    body["id"].as_i64().expect("No supply id") as i32
}

async fn create_booking(
    client: &Client,
    requester: i32,
    equipment_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> reqwest::Response {
    client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(token_for(requester))
        .json(&json!({
            "equipment_id": equipment_id,
            "start_date": start,
            "end_date": end,
        }))
        .send()
        .await
        .expect("Failed to send booking request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_requests_require_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_booking_date_conflicts_at_boundaries() {
    // Scenario A: an approved booking blocks overlapping and
    // boundary-sharing ranges; a disjoint later range succeeds.
    let client = Client::new();
    let owner = 101;
    let requester = 102;
    let equipment_id = create_equipment(&client, owner, "Boundary tractor").await;

    let response = create_booking(&client, requester, equipment_id, day(10), day(14)).await;
    assert_eq!(response.status(), 201);
    let booking: Value = response.json().await.unwrap();
    let booking_id = booking["id"].as_i64().unwrap();
    assert_eq!(booking["status"], "pending");

    let response = client
        .patch(format!("{}/bookings/{}/approve", BASE_URL, booking_id))
        .bearer_auth(token_for(owner))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Overlapping range
    let response = create_booking(&client, requester, equipment_id, day(12), day(15)).await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Date conflict detected");

    // Shared boundary day
    let response = create_booking(&client, requester, equipment_id, day(14), day(17)).await;
    assert_eq!(response.status(), 409);

    // Disjoint range, starting the day after
    let response = create_booking(&client, requester, equipment_id, day(15), day(17)).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_booking_validation_rejects_bad_dates() {
    let client = Client::new();
    let owner = 103;
    let equipment_id = create_equipment(&client, owner, "Validation tractor").await;

    // End before start
    let response = create_booking(&client, 104, equipment_id, day(10), day(5)).await;
    assert_eq!(response.status(), 400);

    // Zero-length rental
    let response = create_booking(&client, 104, equipment_id, day(10), day(10)).await;
    assert_eq!(response.status(), 400);

    // Unknown equipment
    let response = create_booking(&client, 104, 999_999, day(10), day(12)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_cancel_then_approve_is_invalid_transition() {
    // Scenario C: cancelled is terminal.
    let client = Client::new();
    let owner = 105;
    let requester = 106;
    let equipment_id = create_equipment(&client, owner, "Lifecycle tractor").await;

    let response = create_booking(&client, requester, equipment_id, day(20), day(22)).await;
    assert_eq!(response.status(), 201);
    let booking: Value = response.json().await.unwrap();
    let booking_id = booking["id"].as_i64().unwrap();

    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .bearer_auth(token_for(requester))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "cancelled");

    let response = client
        .patch(format!("{}/bookings/{}/approve", BASE_URL, booking_id))
        .bearer_auth(token_for(owner))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // The rejected approve must not have touched the row
    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .bearer_auth(token_for(requester))
        .send()
        .await
        .unwrap();
    let bookings: Vec<Value> = response.json().await.unwrap();
    let booking = bookings
        .iter()
        .find(|b| b["id"].as_i64() == Some(booking_id))
        .unwrap();
    assert_eq!(booking["status"], "cancelled");
}

#[tokio::test]
#[ignore]
async fn test_transitions_are_actor_gated() {
    let client = Client::new();
    let owner = 107;
    let requester = 108;
    let equipment_id = create_equipment(&client, owner, "Gated tractor").await;

    let response = create_booking(&client, requester, equipment_id, day(30), day(32)).await;
    let booking: Value = response.json().await.unwrap();
    let booking_id = booking["id"].as_i64().unwrap();

    // Requester may not approve
    let response = client
        .patch(format!("{}/bookings/{}/approve", BASE_URL, booking_id))
        .bearer_auth(token_for(requester))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Owner may not cancel
    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .bearer_auth(token_for(owner))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_cancelling_booking_frees_equipment() {
    let client = Client::new();
    let owner = 109;
    let requester = 110;
    let equipment_id = create_equipment(&client, owner, "Freed tractor").await;

    let response = create_booking(&client, requester, equipment_id, day(40), day(44)).await;
    let booking: Value = response.json().await.unwrap();
    let booking_id = booking["id"].as_i64().unwrap();

    // Pending booking blocks the range and clears the derived flag
    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .bearer_auth(token_for(owner))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["available"], false);

    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .bearer_auth(token_for(requester))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Recompute ran on the transition: equipment is available again
    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .bearer_auth(token_for(owner))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["available"], true);

    let response = create_booking(&client, requester, equipment_id, day(40), day(44)).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_blocks_booking() {
    let client = Client::new();
    let owner = 111;
    let equipment_id = create_equipment(&client, owner, "Serviced tractor").await;

    let response = client
        .post(format!("{}/maintenance/schedule", BASE_URL))
        .bearer_auth(token_for(owner))
        .json(&json!({
            "equipment_id": equipment_id,
            "maintenance_type": "engine_service",
            "scheduled_date": day(51),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let window: Value = response.json().await.unwrap();
    let window_id = window["id"].as_i64().unwrap();

    let response = create_booking(&client, 112, equipment_id, day(50), day(53)).await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Maintenance conflict detected");

    // Completing the maintenance unblocks the range
    let response = client
        .put(format!("{}/maintenance/{}/status", BASE_URL, window_id))
        .bearer_auth(token_for(owner))
        .json(&json!({ "status": "completed", "cost": 250.0, "technician": "R. Diesel" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = create_booking(&client, 112, equipment_id, day(50), day(53)).await;
    assert_eq!(response.status(), 201);

    // Completed is terminal for maintenance too
    let response = client
        .put(format!("{}/maintenance/{}/status", BASE_URL, window_id))
        .bearer_auth(token_for(owner))
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_requires_owner() {
    let client = Client::new();
    let owner = 113;
    let equipment_id = create_equipment(&client, owner, "Owned tractor").await;

    let response = client
        .post(format!("{}/maintenance/schedule", BASE_URL))
        .bearer_auth(token_for(114))
        .json(&json!({
            "equipment_id": equipment_id,
            "maintenance_type": "oil_change",
            "scheduled_date": day(60),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_stock_reservation_and_restore() {
    // Scenario B: reserve 6 of 10, reject 5, cancel restores to 10.
    let client = Client::new();
    let supplier = 115;
    let buyer = 116;
    let supply_id = create_supply(&client, supplier, "Seed potatoes", 10).await;

    let response = client
        .post(format!("{}/supplies/{}/order", BASE_URL, supply_id))
        .bearer_auth(token_for(buyer))
        .json(&json!({ "quantity": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let order: Value = response.json().await.unwrap();
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["original_supply_quantity"], 10);
    assert_eq!(order["remaining_supply_quantity"], 4);

    // 4 left: ordering 5 more fails
    let response = client
        .post(format!("{}/supplies/{}/order", BASE_URL, supply_id))
        .bearer_auth(token_for(buyer))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Cancel the first order: stock restored
    let response = client
        .put(format!("{}/supplies/orders/{}/status", BASE_URL, order_id))
        .bearer_auth(token_for(buyer))
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/supplies", BASE_URL))
        .bearer_auth(token_for(buyer))
        .send()
        .await
        .unwrap();
    let supplies: Value = response.json().await.unwrap();
    let supply = supplies
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(supply_id as i64))
        .expect("Supply missing from list");
    assert_eq!(supply["available_quantity"], 10);

    // Second cancellation is a no-op, not a double restore
    let response = client
        .put(format!("{}/supplies/orders/{}/status", BASE_URL, order_id))
        .bearer_auth(token_for(buyer))
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/supplies", BASE_URL))
        .bearer_auth(token_for(buyer))
        .send()
        .await
        .unwrap();
    let supplies: Value = response.json().await.unwrap();
    let supply = supplies
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(supply_id as i64))
        .unwrap();
    assert_eq!(supply["available_quantity"], 10);
}

#[tokio::test]
#[ignore]
async fn test_restock_refuses_to_undercut_reservations() {
    let client = Client::new();
    let supplier = 117;
    let buyer = 118;
    let supply_id = create_supply(&client, supplier, "Fertilizer", 10).await;

    let response = client
        .post(format!("{}/supplies/{}/order", BASE_URL, supply_id))
        .bearer_auth(token_for(buyer))
        .json(&json!({ "quantity": 8 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // 2 available; reducing the total by 3 would go negative
    let response = client
        .put(format!("{}/supplies/{}/quantity", BASE_URL, supply_id))
        .bearer_auth(token_for(supplier))
        .json(&json!({ "total_quantity": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Restocking up is fine and shifts available stock by the delta
    let response = client
        .put(format!("{}/supplies/{}/quantity", BASE_URL, supply_id))
        .bearer_auth(token_for(supplier))
        .json(&json!({ "total_quantity": 15 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let supply: Value = response.json().await.unwrap();
    assert_eq!(supply["total_quantity"], 15);
    assert_eq!(supply["available_quantity"], 7);

    // Only the supplier may restock
    let response = client
        .put(format!("{}/supplies/{}/quantity", BASE_URL, supply_id))
        .bearer_auth(token_for(buyer))
        .json(&json!({ "total_quantity": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_booking_stream_handshake() {
    let client = Client::new();

    let mut response = client
        .get(format!("{}/bookings/stream", BASE_URL))
        .bearer_auth(token_for(119))
        .send()
        .await
        .expect("Failed to open stream");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/event-stream"))
        .unwrap_or(false));

    // First frame is the connected handshake
    let chunk = response.chunk().await.expect("Stream error").expect("Stream closed");
    let text = String::from_utf8_lossy(&chunk);
    assert!(text.contains("connected"), "unexpected first frame: {text}");
}
