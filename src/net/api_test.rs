use reqwest::Method;
use serde::de::IgnoredAny;
use serde_json::{Value, json};

use super::*;
use crate::state::test_helpers::{harness, user};

// =============================================================
// Bearer attachment
// =============================================================

#[tokio::test]
async fn no_token_sends_no_authorization_header() {
    let h = harness();
    h.transport.respond(Method::GET, "/cards/1", 200, json!({ "id": "1" }));
    let _card: Value = h.api.get("/cards/1").await.unwrap();
    assert_eq!(h.transport.last().unwrap().header("authorization"), None);
}

#[tokio::test]
async fn token_is_attached_as_bearer() {
    let h = harness();
    h.handle().set_token("abc");
    h.transport.respond(Method::GET, "/decks/d1", 200, json!({}));
    let _resp: Value = h.api.get("/decks/d1").await.unwrap();
    assert_eq!(h.transport.last().unwrap().header("Authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn empty_token_is_not_attached() {
    let h = harness();
    h.handle().set_token("");
    h.transport.respond(Method::GET, "/decks", 200, json!([]));
    let _resp: Value = h.api.get("/decks").await.unwrap();
    assert_eq!(h.transport.last().unwrap().header("authorization"), None);
}

// =============================================================
// 401 interception
// =============================================================

#[tokio::test]
async fn unauthorized_clears_session_and_redirects_home() {
    let h = harness();
    h.sign_in("T", user("1", Some("admin")));
    h.transport.respond(Method::DELETE, "/decks/d1", 401, json!({ "message": "expired" }));

    let err = h.api.delete::<IgnoredAny>("/decks/d1").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!h.handle().is_authenticated());
    assert!(h.handle().user().is_none());
    assert_eq!(h.persisted(), None);
    assert_eq!(h.navigator.history(), vec![SESSION_REJECTED_ROUTE]);
}

#[tokio::test]
async fn every_401_is_intercepted_regardless_of_endpoint() {
    let h = harness();
    for path in ["/user-cards/u1", "/users", "/decks/user/u1"] {
        h.handle().set_token("T");
        h.transport.respond(Method::GET, path, 401, Value::Null);
        let err = h.api.get::<Value>(path).await.unwrap_err();
        assert!(err.is_auth_failure());
        assert!(!h.handle().is_authenticated());
    }
    assert_eq!(h.navigator.history().len(), 3);
}

#[tokio::test]
async fn forbidden_is_not_a_session_failure() {
    let h = harness();
    h.handle().set_token("T");
    h.transport.respond(Method::GET, "/users", 403, json!({ "message": "admins only" }));

    let err = h.api.get::<Value>("/users").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 403, .. }));
    assert!(h.handle().is_authenticated());
    assert!(h.navigator.history().is_empty());
}

// =============================================================
// Public requests
// =============================================================

#[tokio::test]
async fn public_request_skips_bearer_and_interception() {
    let h = harness();
    h.sign_in("T", user("1", None));
    h.transport.respond(Method::GET, "/auth/google/callback", 401, json!({}));

    let err = h.api.send_public(ApiRequest::get("/auth/google/callback")).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert!(h.handle().is_authenticated());
    assert_eq!(h.navigator.last(), None);
    assert_eq!(h.transport.last().unwrap().header("authorization"), None);
}

#[tokio::test]
async fn public_json_decodes_success() {
    let h = harness();
    h.transport.respond(Method::GET, "/auth/google/callback", 200, json!({ "token": "abc" }));
    let body: Value = h.api.request_public_json(ApiRequest::get("/auth/google/callback")).await.unwrap();
    assert_eq!(body, json!({ "token": "abc" }));
}

// =============================================================
// Status / body handling
// =============================================================

#[tokio::test]
async fn status_error_keeps_body() {
    let h = harness();
    h.transport.respond(Method::GET, "/cards/404", 404, json!({ "message": "no such card" }));
    let err = h.api.get::<Value>("/cards/404").await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("no such card"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_error_passes_through() {
    let h = harness();
    h.transport.unreachable(Method::GET, "/cards/1", "dns failure");
    let err = h.api.get::<Value>("/cards/1").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(msg) if msg == "dns failure"));
}

#[tokio::test]
async fn post_sends_json_body() {
    let h = harness();
    h.transport.respond(Method::POST, "/decks", 201, json!({ "deck": { "id": "d1", "name": "Burn" } }));
    let resp: Value = h.api.post("/decks", &json!({ "name": "Burn" })).await.unwrap();
    assert_eq!(resp["deck"]["id"], "d1");
    assert_eq!(h.transport.last().unwrap().body, Some(json!({ "name": "Burn" })));
}

#[tokio::test]
async fn empty_success_body_decodes_into_ignored_any() {
    let h = harness();
    h.transport.respond(Method::DELETE, "/user-cards/c1", 204, Value::Null);
    assert!(h.api.delete::<IgnoredAny>("/user-cards/c1").await.is_ok());
}

#[tokio::test]
async fn put_and_patch_use_their_methods() {
    let h = harness();
    h.transport.respond(Method::PUT, "/decks/d1", 200, json!({}));
    h.transport.respond(Method::PATCH, "/users/u1", 200, json!({}));
    let _put: Value = h.api.put("/decks/d1", &json!({ "name": "x" })).await.unwrap();
    let _patch: Value = h.api.patch("/users/u1", &json!({ "role": "user" })).await.unwrap();
    let methods: Vec<Method> = h.transport.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::PUT, Method::PATCH]);
}

#[tokio::test]
async fn query_parameters_are_forwarded() {
    let h = harness();
    h.transport.respond(Method::GET, "/auth/google/callback", 200, json!({ "token": "t" }));
    let request = ApiRequest::get("/auth/google/callback").with_query("code", "abc");
    let _resp: Value = h.api.request_json(request).await.unwrap();
    assert_eq!(h.transport.last().unwrap().query, vec![("code".to_owned(), "abc".to_owned())]);
}
