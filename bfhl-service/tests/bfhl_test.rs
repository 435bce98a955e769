mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use common::{TestApp, TEST_EMAIL, TEST_ROLL_NUMBER, TEST_USER_ID};
use reqwest::multipart;
use serde_json::{json, Value};

fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len, 0);
    bytes
}

#[tokio::test]
async fn get_returns_operation_code() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.bfhl_url())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "operation_code": 1 }));
}

#[tokio::test]
async fn post_classifies_mixed_data() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(&json!({ "data": [3, "5", "a", "Z", "bc"] }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        json!({
            "is_success": true,
            "user_id": TEST_USER_ID,
            "email": TEST_EMAIL,
            "roll_number": TEST_ROLL_NUMBER,
            "numbers": [3, "5"],
            "alphabets": ["a", "Z"],
            "highest_lowercase_alphabet": ["a"],
            "is_prime_found": true,
            "file_valid": false,
            "file_mime_type": null,
            "file_size_kb": null
        })
    );
}

#[tokio::test]
async fn post_without_primes_or_letters() {
    let app = TestApp::spawn().await;

    let response = app.post_json(&json!({ "data": [4, 6, 9] })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["numbers"], json!([4, 6, 9]));
    assert_eq!(body["is_prime_found"], false);
    assert_eq!(body["alphabets"], json!([]));
    assert_eq!(body["highest_lowercase_alphabet"], json!([]));
}

#[tokio::test]
async fn post_echoes_integral_floats_as_integers() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.bfhl_url())
        .header("content-type", "application/json")
        .body(r#"{"data": [3.0, 1e2, 4.5]}"#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains(r#""numbers":[3,100,4.5]"#), "body = {}", body);
}

#[tokio::test]
async fn post_without_data_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_json(&json!({ "file_b64": "QUJD" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        json!({ "is_success": false, "message": "Invalid input data" })
    );
}

#[tokio::test]
async fn post_with_non_list_data_is_rejected() {
    let app = TestApp::spawn().await;

    for data in [json!("abc"), json!(5), json!({ "0": "a" }), json!(null)] {
        let response = app.post_json(&json!({ "data": data })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "data = {}", data);
    }
}

#[tokio::test]
async fn post_with_malformed_json_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.bfhl_url())
        .header("content-type", "application/json")
        .body("{\"data\": [1, 2")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Invalid input data");
}

#[tokio::test]
async fn post_with_png_attachment_is_valid() {
    let app = TestApp::spawn().await;
    let png = png_bytes(3000);

    let response = app
        .post_json(&json!({ "data": ["x"], "file_b64": STANDARD.encode(&png) }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["file_valid"], true);
    assert_eq!(body["file_mime_type"], "image/png");
    assert_eq!(body["file_size_kb"], 3);
    assert_eq!(body["highest_lowercase_alphabet"], json!(["x"]));
}

#[tokio::test]
async fn post_with_text_attachment_is_invalid() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(&json!({
            "data": [],
            "file_b64": STANDARD.encode("plain text, nothing to sniff here"),
        }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["file_valid"], false);
    assert_eq!(body["file_mime_type"], Value::Null);
    assert_eq!(body["file_size_kb"], Value::Null);
}

#[tokio::test]
async fn post_with_non_base64_attachment_keeps_defaults() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(&json!({ "data": [2], "file_b64": "not base64!" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["is_prime_found"], true);
    assert_eq!(body["file_valid"], false);
    assert_eq!(body["file_mime_type"], Value::Null);
}

#[tokio::test]
async fn post_with_short_text_attachment_degrades() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(&json!({ "data": ["1"], "file_b64": "QUJDR" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["file_valid"], false);
    assert_eq!(body["numbers"], json!(["1"]));
}

#[tokio::test]
async fn post_with_dangling_base64_char_is_still_valid() {
    let app = TestApp::spawn().await;
    let encoded = format!("{}A", STANDARD.encode(png_bytes(3000)));

    let response = app
        .post_json(&json!({ "data": [], "file_b64": encoded }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["file_valid"], true);
    assert_eq!(body["file_mime_type"], "image/png");
    assert_eq!(body["file_size_kb"], 3);
}

#[tokio::test]
async fn post_is_idempotent() {
    let app = TestApp::spawn().await;
    let payload = json!({
        "data": ["M", "1", "334", "4", "B", "z", "0x1F", " "],
        "file_b64": STANDARD.encode(png_bytes(700)),
    });

    let first: Value = app.post_json(&payload).await.json().await.unwrap();
    let second: Value = app.post_json(&payload).await.json().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first["file_size_kb"], 1);
}

#[tokio::test]
async fn post_form_encoded_body() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.bfhl_url())
        .form(&[("data[]", "7"), ("data[]", "q"), ("data[]", "Q"), ("data[]", "zz")])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["numbers"], json!(["7"]));
    assert_eq!(body["alphabets"], json!(["q", "Q"]));
    assert_eq!(body["highest_lowercase_alphabet"], json!(["q"]));
    assert_eq!(body["is_prime_found"], true);
}

#[tokio::test]
async fn post_form_with_scalar_data_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.bfhl_url())
        .form(&[("data", "7")])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_multipart_text_fields() {
    let app = TestApp::spawn().await;
    let form = multipart::Form::new()
        .text("data[]", "11")
        .text("data[]", "b")
        .text("file_b64", STANDARD.encode(png_bytes(100)));

    let response = app
        .client
        .post(app.bfhl_url())
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["numbers"], json!(["11"]));
    assert_eq!(body["alphabets"], json!(["b"]));
    assert_eq!(body["file_valid"], true);
    assert_eq!(body["file_size_kb"], 0);
}

#[tokio::test]
async fn post_multipart_file_part_is_rejected() {
    let app = TestApp::spawn().await;
    let form = multipart::Form::new().text("data[]", "1").part(
        "upload",
        multipart::Part::bytes(png_bytes(64))
            .file_name("image.png")
            .mime_str("image/png")
            .unwrap(),
    );

    let response = app
        .client
        .post(app.bfhl_url())
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_without_body_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.bfhl_url())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.port > 0);
}
