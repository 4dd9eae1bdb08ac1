use hotcoffee_infra::config::StorageConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) over a scratch data directory, bound to an ephemeral port.
        let data_dir = tempfile::tempdir().expect("failed to create temp dir");
        let services = hotcoffee_api::app::services::build_services(&StorageConfig::new(data_dir.path()))
            .expect("failed to open stores");
        let app = hotcoffee_api::app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _data_dir: data_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn seed_latte(client: &reqwest::Client, srv: &TestServer) {
    let res = client
        .post(srv.url("/inventory"))
        .json(&json!([
            {"ingredient_id": "espresso_shot", "name": "espresso shot", "quantity": 10, "unit": "shots"},
            {"ingredient_id": "milk", "name": "whole milk", "quantity": 1000, "unit": "ml"}
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(srv.url("/menu"))
        .json(&json!({
            "product_id": "latte",
            "name": "caffe latte",
            "description": "espresso with steamed milk",
            "price": 3.5,
            "ingredients": [
                {"ingredient_id": "espresso_shot", "quantity": 1},
                {"ingredient_id": "milk", "quantity": 200}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn quantity_of(client: &reqwest::Client, srv: &TestServer, id: &str) -> f64 {
    let body: Value = client
        .get(srv.url(&format!("/inventory/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["quantity"].as_f64().unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn inventory_crud_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!({"ingredient_id": "Oat_Milk", "name": "oat milk", "quantity": 500, "unit": "ML"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["ingredient_id"], "oat_milk");
    assert_eq!(created["name"], "Oat Milk");
    assert_eq!(created["unit"], "ml");

    let res = client
        .put(srv.url("/inventory/oat_milk"))
        .json(&json!({"ingredient_id": "oat_milk", "name": "oat milk", "quantity": 250, "unit": "ml"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(quantity_of(&client, &srv, "oat_milk").await, 250.0);

    let list: Value = client.get(srv.url("/inventory")).send().await.unwrap().json().await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let res = client.delete(srv.url("/inventory/oat_milk")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url("/inventory/oat_milk")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn validation_and_conflict_errors_use_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!({"ingredient_id": "sugar", "name": "sugar", "quantity": -1, "unit": "g"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let item = json!({"ingredient_id": "sugar", "name": "sugar", "quantity": 10, "unit": "g"});
    let res = client.post(srv.url("/inventory")).json(&item).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = client.post(srv.url("/inventory")).json(&item).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_exists");

    let res = client.get(srv.url("/inventory/not-an-id!")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_flow_deducts_stock_closes_and_reports() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_latte(&client, &srv).await;

    let res = client
        .post(srv.url("/orders"))
        .json(&json!({"customer_name": "alice", "items": [{"product_id": "latte", "quantity": 2}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["customer_name"], "Alice");
    let order_id = order["order_id"].as_str().unwrap().to_string();

    assert_eq!(quantity_of(&client, &srv, "espresso_shot").await, 8.0);
    assert_eq!(quantity_of(&client, &srv, "milk").await, 600.0);

    let res = client
        .post(srv.url(&format!("/orders/{order_id}/close")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let closed: Value = res.json().await.unwrap();
    assert_eq!(closed["status"], "closed");

    let sales: Value = client
        .get(srv.url("/reports/total-sales"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sales["total_items_sold"], 2);
    assert_eq!(sales["total_revenue"].as_f64().unwrap(), 7.0);

    let popular: Value = client
        .get(srv.url("/reports/popular-items?limit=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(popular.as_array().unwrap().len(), 1);
    assert_eq!(popular[0]["product_id"], "latte");
    assert_eq!(popular[0]["name"], "Caffe Latte");

    let res = client.delete(srv.url(&format!("/orders/{order_id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(quantity_of(&client, &srv, "milk").await, 600.0);
}

#[tokio::test]
async fn unavailable_order_is_conflict_and_changes_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_latte(&client, &srv).await;

    let res = client
        .post(srv.url("/orders"))
        .json(&json!({"customer_name": "bob", "items": [{"product_id": "latte", "quantity": 6}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unavailable");

    assert_eq!(quantity_of(&client, &srv, "milk").await, 1000.0);
    assert_eq!(quantity_of(&client, &srv, "espresso_shot").await, 10.0);

    let orders: Value = client.get(srv.url("/orders")).send().await.unwrap().json().await.unwrap();
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn available_menu_tracks_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_latte(&client, &srv).await;

    let available: Value = client
        .get(srv.url("/menu/available"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(available.as_array().unwrap().len(), 1);

    let res = client
        .put(srv.url("/inventory/milk"))
        .json(&json!({"ingredient_id": "milk", "name": "whole milk", "quantity": 100, "unit": "ml"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let available: Value = client
        .get(srv.url("/menu/available"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(available.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_latte(&client, &srv).await;

    let res = client
        .post(srv.url("/orders"))
        .json(&json!({"customer_name": "olga", "items": [{"product_id": "latte", "quantity": -1}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].is_string());

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!({"ingredient_id": "flour", "name": "flour", "quantity": 2, "unit": "kg"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = client
        .put(srv.url("/menu/latte"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    assert_eq!(quantity_of(&client, &srv, "milk").await, 1000.0);
    let orders: Value = client.get(srv.url("/orders")).send().await.unwrap().json().await.unwrap();
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_with_mismatched_body_id_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_latte(&client, &srv).await;

    let res = client
        .put(srv.url("/inventory/milk"))
        .json(&json!({"ingredient_id": "oat_milk", "name": "oat milk", "quantity": 5, "unit": "ml"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(quantity_of(&client, &srv, "milk").await, 1000.0);
}
