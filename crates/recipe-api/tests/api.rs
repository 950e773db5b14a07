//! End-to-end API behaviour over a real socket.

use pretty_assertions::assert_eq;
use recipe_api::{AppState, build_router, serve};
use recipe_config::ServerConfig;
use recipe_db::service::RecipeService;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    client: Client,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let service = RecipeService::new_local(":memory:").await.unwrap();
        let app = build_router(AppState::new(service), &config);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, app, std::future::pending()));
        Self {
            base: format!("http://{address}"),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/user/create/"))
            .json(&json!({ "email": email, "password": password, "name": "Test Name" }))
            .send()
            .await
            .unwrap()
    }

    /// Create an account and return its token.
    async fn login(&self, email: &str) -> String {
        let created = self.create_user(email, "testpass123").await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = self
            .client
            .post(self.url("/api/user/token/"))
            .json(&json!({ "email": email, "password": "testpass123" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    fn authed(&self, method: reqwest::Method, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Authorization", format!("Token {token}"))
    }

    async fn create_recipe(&self, token: &str, body: Value) -> Value {
        let resp = self
            .authed(reqwest::Method::POST, "/api/recipe/recipes/", token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.unwrap()
    }
}

fn sample_recipe() -> Value {
    json!({
        "title": "Sample recipe title",
        "time_minutes": 22,
        "price": "5.25",
        "description": "Sample description",
        "link": "http://example.com/recipe.pdf",
    })
}

fn recipe_url(id: &Value) -> String {
    format!("/api/recipe/recipes/{id}/")
}

#[tokio::test]
async fn health_and_schema_are_public() {
    let server = TestServer::start().await;

    let health: Value = server
        .client
        .get(server.url("/api/health/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({ "status": "ok" }));

    let schema: Value = server
        .client
        .get(server.url("/api/schema/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(schema["openapi"], "3.1.0");
    assert!(schema["paths"]["/api/recipe/recipes/{id}/"]["patch"].is_object());
    assert!(schema["components"]["schemas"]["Recipe"].is_object());

    let docs = server
        .client
        .get(server.url("/api/docs/"))
        .send()
        .await
        .unwrap();
    assert_eq!(docs.status(), StatusCode::OK);
    let content_type = docs.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    assert!(docs.text().await.unwrap().contains("/api/schema/"));
}

#[tokio::test]
async fn create_user_success_hides_password() {
    let server = TestServer::start().await;
    let resp = server.create_user("test@example.com", "testpass123").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(body["name"], "Test Name");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_and_short_password_are_400() {
    let server = TestServer::start().await;
    server.create_user("test@example.com", "testpass123").await;

    let dup = server.create_user("test@example.com", "testpass123").await;
    assert_eq!(dup.status(), StatusCode::BAD_REQUEST);

    let short = server.create_user("short@example.com", "pw").await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let body: Value = short.json().await.unwrap();
    assert_eq!(body["field"], "password");
}

#[tokio::test]
async fn token_rejects_bad_credentials() {
    let server = TestServer::start().await;
    server.create_user("test@example.com", "goodpass").await;

    for credentials in [
        json!({ "email": "test@example.com", "password": "badpass" }),
        json!({ "email": "nobody@example.com", "password": "goodpass" }),
        json!({ "email": "test@example.com", "password": "" }),
    ] {
        let resp = server
            .client
            .post(server.url("/api/user/token/"))
            .json(&credentials)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{credentials}");
        let body: Value = resp.json().await.unwrap();
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn profile_requires_auth_and_updates() {
    let server = TestServer::start().await;

    let anonymous = server
        .client
        .get(server.url("/api/user/me/"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = server.login("me@example.com").await;
    let me: Value = server
        .authed(reqwest::Method::GET, "/api/user/me/", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["email"], "me@example.com");

    let updated = server
        .authed(reqwest::Method::PATCH, "/api/user/me/", &token)
        .json(&json!({ "name": "Updated name", "password": "newpassword123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value = updated.json().await.unwrap();
    assert_eq!(updated["name"], "Updated name");

    let relogin = server
        .client
        .post(server.url("/api/user/token/"))
        .json(&json!({ "email": "me@example.com", "password": "newpassword123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(relogin.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_scheme_and_bad_tokens() {
    let server = TestServer::start().await;
    let token = server.login("me@example.com").await;

    let bearer = server
        .client
        .get(server.url("/api/recipe/recipes/"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(bearer.status(), StatusCode::OK);

    let bogus = server
        .authed(reqwest::Method::GET, "/api/recipe/recipes/", "not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(bogus.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn recipes_are_limited_to_owner() {
    let server = TestServer::start().await;
    let mine = server.login("user@example.com").await;
    let theirs = server.login("other@example.com").await;

    server.create_recipe(&theirs, sample_recipe()).await;
    let first = server.create_recipe(&mine, sample_recipe()).await;
    let second = server
        .create_recipe(&mine, json!({ "title": "Second", "time_minutes": 5, "price": "1.00" }))
        .await;

    let list: Value = server
        .authed(reqwest::Method::GET, "/api/recipe/recipes/", &mine)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&Value> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| &r["id"])
        .collect();
    assert_eq!(ids, [&second["id"], &first["id"]]);
}

#[tokio::test]
async fn recipe_detail_update_and_delete() {
    let server = TestServer::start().await;
    let token = server.login("user@example.com").await;
    let recipe = server.create_recipe(&token, sample_recipe()).await;
    let url = recipe_url(&recipe["id"]);

    let detail: Value = server
        .authed(reqwest::Method::GET, &url, &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail, recipe);
    assert_eq!(detail["price"], "5.25");

    let patched: Value = server
        .authed(reqwest::Method::PATCH, &url, &token)
        .json(&json!({ "title": "New recipe title" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(patched["title"], "New recipe title");
    assert_eq!(patched["link"], recipe["link"]);

    let replaced: Value = server
        .authed(reqwest::Method::PUT, &url, &token)
        .json(&json!({
            "title": "Full update",
            "time_minutes": 10,
            "price": "2.50",
            "link": "https://example.com/new-recipe.pdf",
            "description": "New recipe description",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(replaced["time_minutes"], 10);
    assert_eq!(replaced["price"], "2.50");

    let deleted = server
        .authed(reqwest::Method::DELETE, &url, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = server
        .authed(reqwest::Method::GET, &url, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_users_recipe_is_404() {
    let server = TestServer::start().await;
    let mine = server.login("user@example.com").await;
    let theirs = server.login("other@example.com").await;
    let recipe = server.create_recipe(&theirs, sample_recipe()).await;
    let url = recipe_url(&recipe["id"]);

    for method in [
        reqwest::Method::GET,
        reqwest::Method::DELETE,
    ] {
        let resp = server.authed(method, &url, &mine).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let still_there = server
        .authed(reqwest::Method::GET, &url, &theirs)
        .send()
        .await
        .unwrap();
    assert_eq!(still_there.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_numeric_recipe_id_is_json_404() {
    let server = TestServer::start().await;
    let token = server.login("user@example.com").await;
    let url = "/api/recipe/recipes/abc/";

    for method in [
        reqwest::Method::GET,
        reqwest::Method::PUT,
        reqwest::Method::PATCH,
        reqwest::Method::DELETE,
    ] {
        let resp = server
            .authed(method.clone(), url, &token)
            .json(&sample_recipe())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "detail": "not found" }));
    }

    let anonymous = server.client.get(server.url(url)).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn changing_owner_via_payload_is_ignored() {
    let server = TestServer::start().await;
    let mine = server.login("user@example.com").await;
    let theirs = server.login("other@example.com").await;
    let recipe = server.create_recipe(&mine, sample_recipe()).await;
    let url = recipe_url(&recipe["id"]);

    let resp = server
        .authed(reqwest::Method::PATCH, &url, &mine)
        .json(&json!({ "user": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let other_view = server
        .authed(reqwest::Method::GET, &url, &theirs)
        .send()
        .await
        .unwrap();
    assert_eq!(other_view.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn nested_tags_and_ingredients() {
    let server = TestServer::start().await;
    let token = server.login("user@example.com").await;

    let mut body = sample_recipe();
    body["tags"] = json!([{ "name": "Thai" }, { "name": "Dinner" }]);
    body["ingredients"] = json!([{ "name": "Cauliflower" }, { "name": "Salt" }]);
    let recipe = server.create_recipe(&token, body).await;
    assert_eq!(recipe["tags"].as_array().unwrap().len(), 2);
    assert_eq!(recipe["ingredients"][0]["name"], "Cauliflower");

    let cleared: Value = server
        .authed(reqwest::Method::PATCH, &recipe_url(&recipe["id"]), &token)
        .json(&json!({ "tags": [] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["tags"], json!([]));
    assert_eq!(cleared["ingredients"].as_array().unwrap().len(), 2);

    let tags: Value = server
        .authed(reqwest::Method::GET, "/api/recipe/tags/", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tag_names: Vec<&str> = tags
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tag_names, ["Thai", "Dinner"]);

    let ingredients: Value = server
        .authed(reqwest::Method::GET, "/api/recipe/ingredients/", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ingredients.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_and_invalid_bodies_are_400_with_detail() {
    let server = TestServer::start().await;
    let token = server.login("user@example.com").await;

    let malformed = server
        .authed(reqwest::Method::POST, "/api/recipe/recipes/", &token)
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let body: Value = malformed.json().await.unwrap();
    assert!(body["detail"].is_string());

    let missing_price = server
        .authed(reqwest::Method::POST, "/api/recipe/recipes/", &token)
        .json(&json!({ "title": "No price", "time_minutes": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_price.status(), StatusCode::BAD_REQUEST);

    let bad_price = server
        .authed(reqwest::Method::POST, "/api/recipe/recipes/", &token)
        .json(&json!({ "title": "Pricey", "time_minutes": 5, "price": "1000.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_price.status(), StatusCode::BAD_REQUEST);

    let blank_title = server
        .authed(reqwest::Method::POST, "/api/recipe/recipes/", &token)
        .json(&json!({ "title": "", "time_minutes": 5, "price": "1.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_title.status(), StatusCode::BAD_REQUEST);
    let body: Value = blank_title.json().await.unwrap();
    assert_eq!(body["field"], "title");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = TestServer::start_with(ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    })
    .await;

    let resp = server
        .client
        .post(server.url("/api/user/create/"))
        .json(&json!({ "email": "big@example.com", "password": "x".repeat(200) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
