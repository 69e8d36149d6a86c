mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn explicit_filters_are_saved_and_reused() {
    let app = TestApp::new().await;

    let first = app.get("/api/search?category=adj.").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.lemmas(), vec!["fome"]);

    let saved = first.set_cookie("duech_filters").expect("filters cookie");
    assert!(saved.contains("Max-Age=2592000"), "{}", saved);
    assert!(!saved.contains("HttpOnly"), "{}", saved);

    // No filter parameters: the cookie decides
    let cookie = first.cookie("duech_filters").expect("cookie pair");
    let second = app.get_with_cookie("/api/search?page=1", &cookie).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.lemmas(), vec!["fome"]);
    assert_eq!(second.data()["filters"]["categories"], json!(["adj."]));
    assert!(second.set_cookie("duech_filters").is_none());

    // New filters replace the saved ones
    let third = app.get_with_cookie("/api/search?q=pololo", &cookie).await;
    assert_eq!(third.lemmas().first().map(String::as_str), Some("pololo"));
    assert!(third.data()["filters"].get("categories").is_none());
    assert!(third.set_cookie("duech_filters").is_some());
}

#[tokio::test]
async fn clearing_filters_expires_the_cookie() {
    let app = TestApp::new().await;

    let res = app.json(Method::DELETE, "/api/search/filters", None, json!({})).await;
    assert_eq!(res.status, StatusCode::OK);
    let expired = res.set_cookie("duech_filters").expect("expiring cookie");
    assert!(expired.contains("Max-Age=0"), "{}", expired);
}

#[tokio::test]
async fn unreadable_cookie_is_ignored() {
    let app = TestApp::new().await;

    let res = app.get_with_cookie("/api/search", "duech_filters=%7Bnot-json").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["total"], 5);
}

#[tokio::test]
async fn public_cookie_cannot_smuggle_editor_filters() {
    let app = TestApp::new().await;

    let raw = urlencoding::encode(r#"{"status":"draft","letters":["g"]}"#).into_owned();
    let res = app.get_with_cookie("/api/search", &format!("duech_filters={}", raw)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["total"], 0);
    assert!(res.data()["filters"].get("status").is_none());
}

#[tokio::test]
async fn editor_filters_use_their_own_cookie() {
    let app = TestApp::new().await;
    let session = app.login("edith").await;

    let res = app.get_with_cookie("/editor/api/search?status=in_review", &session).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.lemmas(), vec!["cuico"]);
    assert!(res.set_cookie("duech_filters").is_none());
    let editor_cookie = res.cookie("duech_editor_filters").expect("editor filters cookie");

    let both = format!("{}; {}", session, editor_cookie);
    let again = app.get_with_cookie("/editor/api/search", &both).await;
    assert_eq!(again.lemmas(), vec!["cuico"]);
    assert_eq!(again.data()["filters"]["status"], "in_review");

    // The public site never reads the editor cookie
    let public = app.get_with_cookie("/api/search", &editor_cookie).await;
    assert_eq!(public.data()["total"], 5);
}

#[tokio::test]
async fn saved_filters_that_no_longer_validate_are_discarded() {
    let app = TestApp::new().await;

    let raw = urlencoding::encode(r#"{"letters":["3"]}"#).into_owned();
    let res = app.get_with_cookie("/api/search", &format!("duech_filters={}", raw)).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["total"], 5);
    let expired = res.set_cookie("duech_filters").expect("expiring cookie");
    assert!(expired.contains("Max-Age=0"), "{}", expired);

    let long = urlencoding::encode(&format!(r#"{{"query":"{}"}}"#, "a".repeat(150))).into_owned();
    let res = app.get_with_cookie("/api/search", &format!("duech_filters={}", long)).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["total"], 5);
}
