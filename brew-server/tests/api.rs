//! Router-level tests against a SQLite file in a temp dir

use axum::Router;
use axum::body::Body;
use brew_server::auth::JwtConfig;
use brew_server::auth::password::hash_password;
use brew_server::db::repository::admin;
use brew_server::{Config, ServerState, build_app};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::io::Cursor;
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "test-secret-key-for-velvet-brew-0123456789";
const ADMIN_EMAIL: &str = "admin@velvetbrew.com";
const ADMIN_PASSWORD: &str = "Admin123";
const BOUNDARY: &str = "velvet-brew-boundary";

struct TestApp {
    app: Router,
    state: ServerState,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database_url = format!("sqlite:{}", dir.path().join("brew.db").display());
        let config = Config::with_overrides(database_url, dir.path().join("uploads"), JwtConfig::with_secret(SECRET));
        let state = ServerState::initialize(&config).await.unwrap();
        Self {
            app: build_app(state.clone()),
            state,
            _dir: dir,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(req).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn seed_admin(&self) {
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        admin::create(self.state.pool(), ADMIN_EMAIL, &hash).await.unwrap();
    }

    async fn login(&self) -> String {
        self.seed_admin().await;
        let (status, body) = self
            .send_json(json_request(
                "POST",
                "/api/admin/login",
                json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn order_body(order_id: &str) -> Value {
    json!({
        "orderId": order_id,
        "customerName": "Sana",
        "phone": "0300-1234567",
        "type": "Pickup",
        "address": "",
        "branch": "Velvet Brew, Gulberg",
        "notes": "Less ice",
        "status": "Placed",
        "subtotal": 10.0,
        "tax": 0.8,
        "total": 10.8,
        "items": [{"name": "Velvet Latte", "qty": 2, "price": 5.0, "optionsText": "Large, Oat"}]
    })
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([90, 60, 30]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Multipart body with text fields and an optional `image` part
fn multipart(method: &str, uri: &str, token: &str, fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_root_banner() {
    let t = TestApp::new().await;
    let (status, body) = t.send(get("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Velvet Brew API is running");

    let (status, body) = t.send_json(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_place_order_and_duplicate() {
    let t = TestApp::new().await;

    let (status, body) = t.send_json(json_request("POST", "/api/orders", order_body("VB-48213"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order placed successfully");

    // Same id in another case is the same order
    let (status, body) = t.send_json(json_request("POST", "/api/orders", order_body("vb-48213"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn test_order_validation_errors() {
    let t = TestApp::new().await;

    let mut missing_type = order_body("VB-10001");
    missing_type.as_object_mut().unwrap().remove("type");
    let (status, body) = t.send_json(json_request("POST", "/api/orders", missing_type)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let mut delivery = order_body("VB-10002");
    delivery["type"] = json!("Delivery");
    let (status, body) = t.send_json(json_request("POST", "/api/orders", delivery)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);

    let mut empty = order_body("VB-10003");
    empty["items"] = json!([]);
    let (status, body) = t.send_json(json_request("POST", "/api/orders", empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    let mut bad_qty = order_body("VB-10004");
    bad_qty["items"][0]["qty"] = json!(0);
    let (status, body) = t.send_json(json_request("POST", "/api/orders", bad_qty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_drifted_totals_are_stored_as_sent() {
    let t = TestApp::new().await;
    let mut body = order_body("VB-20001");
    body["total"] = json!(99.0);
    let (status, _) = t.send_json(json_request("POST", "/api/orders", body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let token = t.login().await;
    let (_, list) = t.send_json(get("/api/orders", Some(&token))).await;
    assert_eq!(list["data"][0]["total"], 99.0);
}

#[tokio::test]
async fn test_client_status_is_replaced_with_placed() {
    let t = TestApp::new().await;
    let mut body = order_body("VB-20002");
    body["status"] = json!("delivered");
    let (status, _) = t.send_json(json_request("POST", "/api/orders", body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let token = t.login().await;
    let (_, list) = t.send_json(get("/api/orders", Some(&token))).await;
    assert_eq!(list["data"][0]["status"], "Placed");

    let (_, tracked) = t.send_json(get("/api/orders/track?orderId=VB-20002&phone=03001234567", None)).await;
    assert_eq!(tracked["data"]["status"], "confirmed");
}

#[tokio::test]
async fn test_order_list_requires_admin() {
    let t = TestApp::new().await;

    let (status, body) = t.send_json(get("/api/orders", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = t.send_json(get("/api/orders", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_order_list_newest_first() {
    let t = TestApp::new().await;
    for id in ["VB-30001", "VB-30002"] {
        let (status, _) = t.send_json(json_request("POST", "/api/orders", order_body(id))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let token = t.login().await;
    let (status, body) = t.send_json(get("/api/orders", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["orderId"], "VB-30002");
    assert_eq!(orders[1]["orderId"], "VB-30001");
    assert_eq!(orders[0]["type"], "Pickup");
    assert_eq!(orders[0]["items"][0]["optionsText"], "Large, Oat");
    assert!(orders[0]["_id"].as_str().is_some());
    assert!(orders[0]["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let t = TestApp::new().await;
    t.seed_admin().await;

    for (email, password) in [(ADMIN_EMAIL, "wrong"), ("nobody@velvetbrew.com", ADMIN_PASSWORD)] {
        let (status, body) = t
            .send_json(json_request(
                "POST",
                "/api/admin/login",
                json!({"email": email, "password": password}),
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 1002);
    }
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let t = TestApp::new().await;
    t.seed_admin().await;
    let (status, body) = t
        .send_json(json_request(
            "POST",
            "/api/admin/login",
            json!({"email": " Admin@VelvetBrew.com ", "password": ADMIN_PASSWORD}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    let (status, _) = t.send_json(get("/api/orders", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_track_order() {
    let t = TestApp::new().await;
    let (status, _) = t.send_json(json_request("POST", "/api/orders", order_body("VB-40001"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = t.send_json(get("/api/orders/track?orderId=vb-40001&phone=03001234567", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderId"], "VB-40001");
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["branch"], "Velvet Brew, Gulberg");

    let (status, body) = t.send_json(get("/api/orders/track?orderId=VB-40001&phone=0300999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");

    let (status, _) = t.send_json(get("/api/orders/track?orderId=VB-49999&phone=03001234567", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_menu_crud() {
    let t = TestApp::new().await;
    let token = t.login().await;
    let png = png_bytes();
    let fields = [
        ("name", "Velvet Latte"),
        ("price", "5.90"),
        ("category", "Coffee"),
        ("description", "Silky espresso"),
    ];

    // Image is required on create
    let (status, body) = t.send_json(multipart("POST", "/api/menu", &token, &fields, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6504);

    let (status, body) = t
        .send_json(multipart("POST", "/api/menu", &token, &fields, Some(("latte.png", png.as_slice()))))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["_id"].as_str().unwrap().to_string();
    let image = body["data"]["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("/uploads/") && image.ends_with(".png"));

    let (status, bytes) = t.send(get(&image, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, png);

    // Update without an image keeps the stored one
    let update = [("name", "Velvet Latte"), ("price", "6.25"), ("category", "Coffee")];
    let (status, body) = t
        .send_json(multipart("PUT", &format!("/api/menu/{id}"), &token, &update, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 6.25);
    assert_eq!(body["data"]["image"], image.as_str());
    assert_eq!(body["data"]["description"], "");

    let (status, body) = t.send_json(get("/api/menu", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Velvet Latte");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/menu/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = t.send_json(delete).await;
    assert_eq!(status, StatusCode::OK);

    let delete_again = Request::builder()
        .method("DELETE")
        .uri(format!("/api/menu/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = t.send_json(delete_again).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_menu_writes_validate_fields() {
    let t = TestApp::new().await;
    let token = t.login().await;
    let png = png_bytes();

    let no_category = [("name", "Latte"), ("price", "4")];
    let (status, body) = t
        .send_json(multipart("POST", "/api/menu", &token, &no_category, Some(("a.png", png.as_slice()))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let bad_price = [("name", "Latte"), ("price", "-2"), ("category", "Coffee")];
    let (status, body) = t
        .send_json(multipart("POST", "/api/menu", &token, &bad_price, Some(("a.png", png.as_slice()))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);

    let fields = [("name", "Latte"), ("price", "4"), ("category", "Coffee")];
    let (status, body) = t
        .send_json(multipart("POST", "/api/menu", &token, &fields, Some(("a.png", &b"not a png"[..]))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6503);

    let (status, body) = t
        .send_json(multipart("PUT", "/api/menu/missing", &token, &fields, None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_menu_writes_require_admin() {
    let t = TestApp::new().await;
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/menu/abc")
        .body(Body::empty())
        .unwrap();
    let (status, _) = t.send_json(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
