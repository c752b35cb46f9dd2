use super::*;
use serde_json::json;

// =============================================================
// ApiRequest
// =============================================================

#[test]
fn request_builders_set_method_and_path() {
    assert_eq!(ApiRequest::get("/a").method, Method::GET);
    assert_eq!(ApiRequest::post("/a").method, Method::POST);
    assert_eq!(ApiRequest::put("/a").method, Method::PUT);
    assert_eq!(ApiRequest::patch("/a").method, Method::PATCH);
    assert_eq!(ApiRequest::delete("/a").method, Method::DELETE);
    assert_eq!(ApiRequest::get("/decks/d1").path, "/decks/d1");
}

#[test]
fn request_query_preserves_order() {
    let req = ApiRequest::get("/users/usernames").with_query("page", 2).with_query("limit", 20);
    assert_eq!(req.query, vec![("page".to_owned(), "2".to_owned()), ("limit".to_owned(), "20".to_owned())]);
}

#[test]
fn request_with_json_sets_body() {
    let req = ApiRequest::post("/decks").with_json(&json!({ "name": "Burn" })).unwrap();
    assert_eq!(req.body, Some(json!({ "name": "Burn" })));
}

#[test]
fn request_header_lookup_is_case_insensitive() {
    let mut req = ApiRequest::get("/auth/profile");
    req.headers.push(("Authorization".into(), "Bearer T".into()));
    assert_eq!(req.header("authorization"), Some("Bearer T"));
    assert_eq!(req.header("x-missing"), None);
}

// =============================================================
// ApiResponse
// =============================================================

#[test]
fn response_success_range() {
    assert!(ApiResponse::new(200, "").is_success());
    assert!(ApiResponse::new(204, "").is_success());
    assert!(!ApiResponse::new(301, "").is_success());
    assert!(!ApiResponse::new(401, "").is_success());
}

#[test]
fn response_json_decodes_body() {
    let resp = ApiResponse::new(200, r#"{"token":"abc"}"#);
    let value: serde_json::Value = resp.json().unwrap();
    assert_eq!(value, json!({ "token": "abc" }));
}

#[test]
fn response_empty_body_decodes_as_null() {
    let resp = ApiResponse::new(204, "  ");
    let value: Option<String> = resp.json().unwrap();
    assert_eq!(value, None);
}

#[test]
fn response_bad_json_is_decode_error() {
    let resp = ApiResponse::new(200, "<html>");
    let err = resp.json::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================
// ReqwestTransport
// =============================================================

#[test]
fn endpoint_url_joins_paths() {
    assert_eq!(endpoint_url("http://h:3000", "/auth/profile"), "http://h:3000/auth/profile");
    assert_eq!(endpoint_url("http://h:3000", "decks"), "http://h:3000/decks");
}

#[test]
fn reqwest_transport_trims_base_url() {
    let transport = ReqwestTransport::with_defaults("http://localhost:3000/").unwrap();
    assert_eq!(transport.base_url(), "http://localhost:3000");
}
