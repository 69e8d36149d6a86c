#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use duech_api_rust::auth::password::hash_password;
use duech_api_rust::auth::Role;
use duech_api_rust::config::AppConfig;
use duech_api_rust::database::models::User;
use duech_api_rust::database::{Corpus, DictionaryStore, MemoryStore};
use duech_api_rust::dictionary::Word;
use duech_api_rust::{app, AppState};

/// Every seeded account uses this password
pub const PASSWORD: &str = "clave-de-prueba";

pub struct Staff {
    pub lexi: User,
    pub edith: User,
    pub ada: User,
    pub root: User,
    pub retired: User,
}

/// The full router over a fresh seeded memory store
pub struct TestApp {
    pub state: AppState,
    pub staff: Staff,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `name=value` of the first Set-Cookie header for `name`, ready to send back
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookie(name)
            .and_then(|raw| raw.split(';').next().map(str::to_string))
    }

    /// The whole Set-Cookie header for `name`, attributes included
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .map(str::to_string)
    }

    pub fn lemmas(&self) -> Vec<String> {
        self.data()["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i["lemma"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.storage.persist_memory_store = false;
    config.search.debug_logging = false;
    config.session.secret = "integration-test-secret".to_string();
    config.session.password_cost = 4;
    config
}

fn user(name: &str, role: Role, active: bool) -> User {
    User {
        id: Uuid::new_v4(),
        username: name.to_string(),
        email: format!("{}@duech.cl", name),
        password_hash: hash_password(PASSWORD, 4).expect("bcrypt hash"),
        role,
        active,
        created_at: Utc::now(),
    }
}

fn seed_words(staff: &Staff) -> Vec<Word> {
    let words = json!([
        {
            "id": 1, "lemma": "cachai", "status": "published",
            "meanings": [{ "meaning": "¿Entiendes? Se usa para comprobar que el interlocutor sigue la conversación.",
                           "categories": ["interj."], "styles": ["espon."] }]
        },
        {
            "id": 2, "lemma": "fome", "status": "published",
            "meanings": [{ "meaning": "Aburrido, sin gracia.", "categories": ["adj."] }]
        },
        {
            "id": 3, "lemma": "pololo", "status": "published",
            "meanings": [{ "meaning": "Novio, pareja sin compromiso formal.", "categories": ["m."],
                           "origin": "mapudungun" }]
        },
        {
            "id": 4, "lemma": "polola", "status": "published",
            "meanings": [{ "meaning": "Novia.", "categories": ["f."] }]
        },
        {
            "id": 5, "lemma": "guagua", "status": "draft", "created_by": staff.lexi.id,
            "meanings": [{ "meaning": "Bebé, niño de pecho.", "categories": ["f."], "origin": "quechua" }]
        },
        {
            "id": 6, "lemma": "ñaño", "status": "published",
            "meanings": [{ "meaning": "Hermano.", "categories": ["m."], "styles": ["afect."] }]
        },
        {
            "id": 7, "lemma": "cuico", "status": "in_review", "assigned_to": staff.lexi.id,
            "meanings": [{ "meaning": "Persona de clase alta.", "categories": ["adj."], "styles": ["desp."] }]
        }
    ]);
    serde_json::from_value(words).expect("seed words")
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let staff = Staff {
            lexi: user("lexi", Role::Lexicographer, true),
            edith: user("edith", Role::Editor, true),
            ada: user("ada", Role::Admin, true),
            root: user("root", Role::Superadmin, true),
            retired: user("retired", Role::Editor, false),
        };

        let corpus = Corpus {
            words: seed_words(&staff),
            users: vec![
                staff.lexi.clone(),
                staff.edith.clone(),
                staff.ada.clone(),
                staff.root.clone(),
                staff.retired.clone(),
            ],
            notes: Vec::new(),
        };

        let store: Arc<dyn DictionaryStore> = Arc::new(MemoryStore::new(corpus));
        let state = AppState::new(config, store).expect("session keys");
        Self { state, staff }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = app(self.state.clone()).oneshot(request).await.expect("infallible router");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None, None)).await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(request(Method::GET, uri, Some(cookie), None)).await
    }

    pub async fn json(&self, method: Method, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(request(method, uri, cookie, Some(body))).await
    }

    /// Logs in and returns the session cookie as `name=value`
    pub async fn login(&self, username: &str) -> String {
        let res = self
            .json(
                Method::POST,
                "/editor/api/auth/login",
                None,
                json!({ "login": username, "password": PASSWORD }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed for {}: {}", username, res.body);
        res.cookie(&self.state.config.session.cookie_name)
            .expect("session cookie")
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(header::HOST, "duech.cl");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Same as [`request`] but sent to another host
pub fn request_on_host(host: &str, method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(header::HOST, host);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}
