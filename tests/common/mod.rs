#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use artika_api::config::AppConfig;
use artika_api::database::models::NewUser;
use artika_api::database::{schema, Store};
use artika_api::types::Role;
use artika_api::{app, AppState};

pub const PASSWORD: &str = "pw123456";

/// The real router on a free port, backed by a fresh in-memory store.
///
/// Each test gets its own server; the store starts with the sample portfolio,
/// categories and settings.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_store(Store::in_memory()).await
    }

    pub async fn start_with_store(store: Store) -> Result<Self> {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("JWT_SECRET", "integration-test-secret"),
            ("ARGON2_MEMORY_KIB", "1024"),
            ("ARGON2_TIME_COST", "1"),
            ("ARGON2_PARALLELISM", "1"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))?;
        let state = AppState::new(config, store)?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// `path` is relative to `/api`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Send a request and return the status and parsed envelope.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.call(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::PUT, path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::PATCH, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.call(Method::DELETE, path, token, None).await
    }

    /// Register through the API and return (user id, token).
    pub async fn register(&self, email: &str) -> Result<(i64, String)> {
        let (status, body) = self
            .post("/auth/register", None, json!({ "email": email, "password": PASSWORD }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register {} failed: {} {}", email, status, body);
        let id = body["data"]["user"]["id"].as_i64().context("missing user id")?;
        let token = body["data"]["token"].as_str().context("missing token")?.to_string();
        Ok((id, token))
    }

    /// Admins cannot register through the API; create one in the store and sign a token for it.
    pub async fn admin(&self, email: &str) -> Result<(i64, String)> {
        let password_hash = self.state.passwords.hash(PASSWORD).await?;
        let user = self
            .state
            .store
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                name: Some("Studio Admin".to_string()),
                role: Role::Admin,
            })
            .await?;
        let token = self.state.tokens.issue(user.id, user.role)?.token;
        Ok((user.id, token))
    }
}

/// A private schema in the database `DATABASE_URL` points at, migrated and seeded.
///
/// Every pooled connection gets `search_path` set to it, so tests never see each
/// other's rows. Call `remove` at the end to drop it.
pub struct PgSchema {
    pub name: String,
    pub pool: PgPool,
    url: String,
}

impl PgSchema {
    /// `None` when `DATABASE_URL` is unset; the caller skips.
    pub async fn create() -> Result<Option<Self>> {
        static NEXT: AtomicU32 = AtomicU32::new(0);

        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL is not set, skipping Postgres test");
            return Ok(None);
        };
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.subsec_nanos();
        let name = format!(
            "artika_test_{}_{}_{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed),
            nanos
        );

        let admin = PgPoolOptions::new().max_connections(1).connect(&url).await?;
        admin.execute(format!("CREATE SCHEMA {}", name).as_str()).await?;
        admin.close().await;

        let search_path = format!("SET search_path TO {}", name);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await?;

        schema::migrate(&pool).await?;
        schema::seed(&pool).await?;
        Ok(Some(Self { name, pool, url }))
    }

    pub fn store(&self) -> Store {
        Store::postgres(self.pool.clone())
    }

    pub async fn remove(self) -> Result<()> {
        self.pool.close().await;
        let admin = PgPoolOptions::new().max_connections(1).connect(&self.url).await?;
        admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.name).as_str())
            .await?;
        admin.close().await;
        Ok(())
    }
}
