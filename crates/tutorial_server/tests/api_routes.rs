use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tutorial_core::db::open_db_in_memory;
use tutorial_server::{serve, ApiConfig, AppState};

async fn spawn_server_with(api: ApiConfig) -> String {
    let conn = open_db_in_memory().expect("open in-memory db");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        serve(listener, AppState::new(conn, api), std::future::pending())
            .await
            .expect("serve app")
    });
    format!("http://{addr}")
}

async fn spawn_server() -> String {
    spawn_server_with(ApiConfig::default()).await
}

async fn create(client: &Client, base: &str, body: Value) -> Value {
    let response = client
        .post(format!("{base}/api/tutorials"))
        .json(&body)
        .send()
        .await
        .expect("create request");
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("create body")
}

async fn message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("message body");
    body["message"].as_str().expect("message field").to_string()
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Welcome to DD Task application.");
}

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let base = spawn_server().await;
    let client = Client::new();

    let created = create(
        &client,
        &base,
        json!({ "title": "New Tutorial", "description": "New Description" }),
    )
    .await;
    assert_eq!(created["title"], "New Tutorial");
    assert_eq!(created["description"], "New Description");
    assert_eq!(created["published"], false);
    assert!(created["createdAt"].as_i64().unwrap() > 0);
    assert!(created.get("_id").is_none());

    let id = created["id"].as_str().unwrap();
    let fetched: Value = client
        .get(format!("{base}/api/tutorials/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_without_title_is_bad_request() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/tutorials"))
        .json(&json!({ "description": "orphan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Content can not be empty!");
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_message() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/tutorials"))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!message(response).await.is_empty());
}

#[tokio::test]
async fn get_unknown_or_malformed_id_is_not_found() {
    let base = spawn_server().await;

    let missing = uuid::Uuid::new_v4();
    let response = reqwest::get(format!("{base}/api/tutorials/{missing}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message(response).await,
        format!("Not found Tutorial with id {missing}")
    );

    let response = reqwest::get(format!("{base}/api/tutorials/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(response).await, "Not found Tutorial with id 999");
}

#[tokio::test]
async fn list_filters_by_title_case_insensitively() {
    let base = spawn_server().await;
    let client = Client::new();
    for title in ["Tutorial 1", "Tutorial 2", "Angular Tutorial", "Test & Tutorial"] {
        create(&client, &base, json!({ "title": title })).await;
    }

    let all: Vec<Value> = client
        .get(format!("{base}/api/tutorials"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 4);

    let angular: Vec<Value> = client
        .get(format!("{base}/api/tutorials?title=angular"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(angular.len(), 1);
    assert_eq!(angular[0]["title"], "Angular Tutorial");

    let special: Vec<Value> = client
        .get(format!("{base}/api/tutorials?title=Test%20%26%20Tutorial"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(special.len(), 1);
    assert_eq!(special[0]["title"], "Test & Tutorial");

    let none: Vec<Value> = client
        .get(format!("{base}/api/tutorials?title=Nonexistent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn published_route_is_not_treated_as_an_id() {
    let base = spawn_server().await;
    let client = Client::new();
    create(&client, &base, json!({ "title": "live", "published": true })).await;
    create(&client, &base, json!({ "title": "draft" })).await;

    let response = client
        .get(format!("{base}/api/tutorials/published"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let published: Vec<Value> = response.json().await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0]["title"], "live");
}

#[tokio::test]
async fn update_overwrites_present_fields_only() {
    let base = spawn_server().await;
    let client = Client::new();
    let created = create(
        &client,
        &base,
        json!({ "title": "Initial Title", "description": "kept" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .put(format!("{base}/api/tutorials/{id}"))
        .json(&json!({ "published": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Tutorial was updated successfully.");

    let fetched: Value = client
        .get(format!("{base}/api/tutorials/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Initial Title");
    assert_eq!(fetched["description"], "kept");
    assert_eq!(fetched["published"], true);
    assert!(fetched["updatedAt"].as_i64().unwrap() >= fetched["createdAt"].as_i64().unwrap());
}

#[tokio::test]
async fn update_rejects_empty_payload_and_unknown_id() {
    let base = spawn_server().await;
    let client = Client::new();
    let created = create(&client, &base, json!({ "title": "stay" })).await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .put(format!("{base}/api/tutorials/{id}"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Data to update can not be empty!");

    let response = client
        .put(format!("{base}/api/tutorials/{id}"))
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Content can not be empty!");

    let missing = uuid::Uuid::new_v4();
    let response = client
        .put(format!("{base}/api/tutorials/{missing}"))
        .json(&json!({ "title": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message(response).await,
        format!("Cannot update Tutorial with id={missing}. Maybe Tutorial was not found!")
    );
}

#[tokio::test]
async fn delete_one_then_again_is_not_found() {
    let base = spawn_server().await;
    let client = Client::new();
    let created = create(&client, &base, json!({ "title": "short lived" })).await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .delete(format!("{base}/api/tutorials/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Tutorial was deleted successfully!");

    let response = client
        .delete(format!("{base}/api/tutorials/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message(response).await,
        format!("Cannot delete Tutorial with id={id}. Maybe Tutorial was not found!")
    );
}

#[tokio::test]
async fn delete_all_reports_count() {
    let base = spawn_server().await;
    let client = Client::new();
    for title in ["a", "b", "c"] {
        create(&client, &base, json!({ "title": title })).await;
    }

    let response = client
        .delete(format!("{base}/api/tutorials"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        message(response).await,
        "3 Tutorials were deleted successfully!"
    );

    let remaining: Vec<Value> = client
        .get(format!("{base}/api/tutorials"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let base = spawn_server_with(ApiConfig {
        max_body_bytes: 64,
        ..ApiConfig::default()
    })
    .await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/tutorials"))
        .json(&json!({ "title": "x".repeat(256) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{base}/api/tutorials"))
        .header("origin", "http://localhost:8081")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn create_and_update_accept_form_bodies() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/tutorials"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("title=Form+Tutorial&description=sent%20as%20a%20form&published=true")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["title"], "Form Tutorial");
    assert_eq!(created["description"], "sent as a form");
    assert_eq!(created["published"], true);

    let id = created["id"].as_str().unwrap();
    let response = client
        .put(format!("{base}/api/tutorials/{id}"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("published=false")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Tutorial was updated successfully.");

    let fetched: Value = client
        .get(format!("{base}/api/tutorials/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Form Tutorial");
    assert_eq!(fetched["published"], false);

    let response = client
        .post(format!("{base}/api/tutorials"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("description=no+title")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Content can not be empty!");
}

#[tokio::test]
async fn published_segment_is_not_an_updatable_id() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .put(format!("{base}/api/tutorials/published"))
        .json(&json!({ "title": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message(response).await,
        "Cannot update Tutorial with id=published. Maybe Tutorial was not found!"
    );

    let response = client
        .delete(format!("{base}/api/tutorials/published"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message(response).await,
        "Cannot delete Tutorial with id=published. Maybe Tutorial was not found!"
    );
}
