use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use logscope::config::{Config, HashConfig, PageConfig, StoreBackend, ThrottleConfig};
use logscope::state::SharedState;
use logscope::store::{MemoryStore, SharedStore};

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
}

/// Response pieces most tests care about.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub token: Option<String>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Reply {
        let resp = req.send().await.expect("request failed");
        let status = resp.status();
        let token = resp
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.to_string());
        let body: Value = resp.json().await.unwrap_or(json!(null));
        Reply {
            status,
            body,
            token,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Reply {
        self.send(
            self.client
                .post(self.url("/api/v1/auth/register"))
                .json(&json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Reply {
        self.send(
            self.client
                .post(self.url("/api/v1/auth/login"))
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register and log in, returning the session token.
    pub async fn signup(&self, name: &str, email: &str) -> String {
        let reply = self.register(name, email, "password123").await;
        assert_eq!(reply.status, StatusCode::OK, "register failed: {}", reply.body);
        let reply = self.login(email, "password123").await;
        assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
        reply.token.expect("login returned no token")
    }

    /// First account, which the store promotes to admin.
    pub async fn bootstrap(&self) -> String {
        self.signup("Admin", "admin@test.com").await
    }

    pub async fn ingest(&self, event: &Value) -> Reply {
        self.send(self.client.post(self.url("/")).json(event)).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Reply {
        self.send(self.client.get(self.url(path)).bearer_auth(token))
            .await
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> Reply {
        self.send(self.client.post(self.url(path)).bearer_auth(token).json(body))
            .await
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> Reply {
        self.send(self.client.put(self.url(path)).bearer_auth(token).json(body))
            .await
    }

    pub async fn user_id(&self, token: &str) -> String {
        let reply = self.get_auth("/api/v1/auth/me", token).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.body["id"].as_str().unwrap().to_string()
    }
}

pub fn test_config() -> Config {
    Config {
        store: StoreBackend::Memory,
        database_url: None,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        cors_origins: vec!["http://localhost:4200".to_string()],
        max_body_size: 64 * 1024,
        log_level: "warn".to_string(),
        token_ttl: Duration::from_secs(3600),
        hash: HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        paging: PageConfig {
            max_count: 50,
            ..PageConfig::default()
        },
        login_throttle: ThrottleConfig::default(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(MemoryStore::new()), test_config()).await
}

pub async fn spawn_app_with(store: SharedStore, config: Config) -> TestApp {
    let state = logscope::build_state(store, config).expect("Failed to build state");
    let app = logscope::build_app(state.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
    }
}
