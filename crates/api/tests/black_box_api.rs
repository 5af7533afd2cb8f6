use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use medirec_auth::{Claims, Role};
use medirec_core::{AppConfig, UserId};
use reqwest::StatusCode;
use serde_json::{Value, json};

const SECRET: &str = "black-box-test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the app (same router as prod), but bind to an ephemeral port.
        let app = medirec_api::app::build_app(AppConfig::new(SECRET));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn register_body(username: &str, email: &str, phone: &str, role: Option<&str>) -> Value {
    let mut body = json!({
        "username": username,
        "email": email,
        "phone": phone,
        "password": "hunter2hunter2",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    body
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    email: &str,
    phone: &str,
    role: Option<&str>,
) -> Value {
    let res = client
        .post(format!("{base_url}/api/v1/auth/register"))
        .json(&register_body(username, email, phone, role))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, identifier: &str, password: &str) -> Value {
    let res = client
        .post(format!("{base_url}/api/v1/auth/login"))
        .json(&json!({ "username_or_email": identifier, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn login_token(client: &reqwest::Client, base_url: &str, identifier: &str) -> String {
    login(client, base_url, identifier, "hunter2hunter2").await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn register_login_and_read_own_profile() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user = register(
        &client,
        &server.base_url,
        "alice",
        "alice@x.com",
        "0811111111",
        None,
    )
    .await;
    // Registration defaults: patient role, active.
    assert_eq!(user["role"], "patient");
    assert_eq!(user["is_active"], true);
    // The credential never appears in a response.
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    // Second registration with the same email conflicts.
    let res = client
        .post(format!("{}/api/v1/auth/register", server.base_url))
        .json(&register_body("alice2", "alice@x.com", "0822222222", None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Wrong password and unknown identifier fail alike.
    for (identifier, password) in [("alice", "wrong-password"), ("nobody", "hunter2hunter2")] {
        let res = client
            .post(format!("{}/api/v1/auth/login", server.base_url))
            .json(&json!({ "username_or_email": identifier, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "invalid credentials");
    }

    let outcome = login(&client, &server.base_url, "alice", "hunter2hunter2").await;
    let token = outcome["token"].as_str().unwrap();
    assert_eq!(outcome["user"]["username"], "alice");

    let res = client
        .get(format!("{}/api/v1/users/me", server.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["email"], "alice@x.com");

    // No token at all: 401.
    let res = client
        .get(format!("{}/api/v1/users/me", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_invalidates_the_old_one() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(
        &client,
        &server.base_url,
        "alice",
        "alice@x.com",
        "0811111111",
        None,
    )
    .await;
    let token = login_token(&client, &server.base_url, "alice").await;

    // Wrong old password is refused and changes nothing.
    let res = client
        .patch(format!("{}/api/v1/users/me/change-password", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "old_password": "wrong", "new_password": "brand-new-secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .patch(format!("{}/api/v1/users/me/change-password", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "old_password": "hunter2hunter2", "new_password": "brand-new-secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&json!({ "username_or_email": "alice", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    login(&client, &server.base_url, "alice", "brand-new-secret").await;
}

#[tokio::test]
async fn role_gating_on_listing_and_hard_delete() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let patient = register(
        &client,
        &server.base_url,
        "pat",
        "pat@x.com",
        "0811111111",
        None,
    )
    .await;
    register(
        &client,
        &server.base_url,
        "adm",
        "adm@x.com",
        "0822222222",
        Some("admin"),
    )
    .await;
    register(
        &client,
        &server.base_url,
        "root",
        "root@x.com",
        "0833333333",
        Some("super_admin"),
    )
    .await;

    let patient_token = login_token(&client, &server.base_url, "pat").await;
    let admin_token = login_token(&client, &server.base_url, "adm").await;
    let root_token = login_token(&client, &server.base_url, "root").await;

    // Listing all accounts is role-gated.
    let res = client
        .get(format!("{}/api/v1/users", server.base_url))
        .bearer_auth(&patient_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/api/v1/users", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing: Value = res.json().await.unwrap();
    assert_eq!(listing["meta"]["total_items"], 3);

    // Hard delete: forbidden below super-admin.
    let target = patient["id"].as_str().unwrap();
    for token in [&patient_token, &admin_token] {
        let res = client
            .delete(format!(
                "{}/api/v1/users/{target}/hard-delete",
                server.base_url
            ))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    let res = client
        .delete(format!(
            "{}/api/v1/users/{target}/hard-delete",
            server.base_url
        ))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The record is purged.
    let res = client
        .get(format!("{}/api/v1/users/{target}", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Deleting an already-purged id is an idempotent success.
    let res = client
        .delete(format!(
            "{}/api/v1/users/{target}/hard-delete",
            server.base_url
        ))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn profile_read_is_ownership_gated_with_admin_bypass() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = register(
        &client,
        &server.base_url,
        "alice",
        "alice@x.com",
        "0811111111",
        None,
    )
    .await;
    let bob = register(
        &client,
        &server.base_url,
        "bob",
        "bob@x.com",
        "0822222222",
        None,
    )
    .await;
    register(
        &client,
        &server.base_url,
        "adm",
        "adm@x.com",
        "0833333333",
        Some("admin"),
    )
    .await;

    let alice_token = login_token(&client, &server.base_url, "alice").await;
    let admin_token = login_token(&client, &server.base_url, "adm").await;

    let alice_id = alice["id"].as_str().unwrap();
    let bob_id = bob["id"].as_str().unwrap();

    // Own profile: allowed.
    let res = client
        .get(format!("{}/api/v1/users/{alice_id}", server.base_url))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Someone else's: forbidden for a non-privileged role.
    let res = client
        .get(format!("{}/api/v1/users/{bob_id}", server.base_url))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin bypasses ownership.
    let res = client
        .get(format!("{}/api/v1/users/{bob_id}", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Unparseable identifier is a bad request, not a forbidden.
    let res = client
        .get(format!("{}/api/v1/users/not-a-uuid", server.base_url))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lifecycle_deactivate_delete_restore_flow() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = register(
        &client,
        &server.base_url,
        "alice",
        "alice@x.com",
        "0811111111",
        None,
    )
    .await;
    register(
        &client,
        &server.base_url,
        "adm",
        "adm@x.com",
        "0822222222",
        Some("admin"),
    )
    .await;

    let alice_id = alice["id"].as_str().unwrap();
    let admin_token = login_token(&client, &server.base_url, "adm").await;

    // Admin deactivation blocks login even with the correct password.
    let res = client
        .patch(format!(
            "{}/api/v1/users/{alice_id}/deactivate",
            server.base_url
        ))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&json!({ "username_or_email": "alice", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "account is inactive");

    // Activation returns a normal success body and restores login.
    let res = client
        .patch(format!(
            "{}/api/v1/users/{alice_id}/activate",
            server.base_url
        ))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "account activated");

    let alice_token = login_token(&client, &server.base_url, "alice").await;

    // Self-deletion with a wrong password re-proof mutates nothing.
    let res = client
        .delete(format!("{}/api/v1/users/me", server.base_url))
        .bearer_auth(&alice_token)
        .json(&json!({ "password": "not-my-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    login(&client, &server.base_url, "alice", "hunter2hunter2").await;

    // Correct re-proof soft-deletes; the account disappears from login.
    let res = client
        .delete(format!("{}/api/v1/users/me", server.base_url))
        .bearer_auth(&alice_token)
        .json(&json!({ "password": "hunter2hunter2", "reason": "leaving" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&json!({ "username_or_email": "alice", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // It is still visible to admins through the deleted listing...
    let res = client
        .get(format!("{}/api/v1/users/deleted", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: Value = res.json().await.unwrap();
    assert_eq!(deleted["meta"]["total_items"], 1);
    assert_eq!(deleted["data"][0]["username"], "alice");

    // ...and restore brings it back with the credential intact.
    let res = client
        .patch(format!(
            "{}/api/v1/users/{alice_id}/restore",
            server.base_url
        ))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    login(&client, &server.base_url, "alice", "hunter2hunter2").await;
}

#[tokio::test]
async fn expired_and_malformed_tokens_are_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Mint an already-expired token with the server's own secret.
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: UserId::new(),
        username: "ghost".to_string(),
        email: "ghost@x.com".to_string(),
        role: Role::Admin,
        iat: now - 7200,
        exp: now - 3600,
    };
    let expired = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    for token in [expired.as_str(), "definitely-not-a-jwt"] {
        let res = client
            .get(format!("{}/api/v1/users/me", server.base_url))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "invalid or expired token");
    }
}
