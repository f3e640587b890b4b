//! Spawns the app on a random port and talks to it over HTTP.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::OnceLock,
};

use anyhow::Result;
use narocniki::{
    config::{get_or_init_config, DbConfig},
    database::DbManager,
    init_dbg_tracing,
    model::{MemorySubscriberStore, PgSubscriberStore, SubscriberStore},
    web::LogSink,
    App, AppState,
};
use reqwest::Response;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    pub app_state: AppState,
}

fn _init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        init_dbg_tracing();
    });
}

impl TestApp {
    /// Serves the app backed by an empty in-memory store.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_store(Box::new(MemorySubscriberStore::new())).await
    }

    /// Serves the app backed by a throwaway database on the server `db_config` points to.
    pub async fn spawn_with_postgres(db_config: &DbConfig) -> Result<Self> {
        let dm = DbManager::test_init(db_config).await?;
        Self::spawn_with_store(Box::new(PgSubscriberStore::new(dm))).await
    }

    /// Serves the app backed by a Postgres pool that can never connect.
    pub async fn spawn_with_unreachable_postgres() -> Result<Self> {
        let mut db_config = get_or_init_config().db_config.clone();
        db_config.host = "127.0.0.1".into();
        db_config.port = 1;
        db_config.acquire_timeout_millis = 500;

        let dm = DbManager::connect_lazy(&db_config);
        Self::spawn_with_store(Box::new(PgSubscriberStore::new(dm))).await
    }

    pub async fn spawn_with_store(store: Box<dyn SubscriberStore>) -> Result<Self> {
        // _init_test_subscriber();

        let config = get_or_init_config();
        let app_state = AppState::new(
            store,
            LogSink::disabled(),
            config.info_config.clone(),
            config.environment,
        );

        let listener = TcpListener::bind(TEST_SOCK_ADDR).await?;
        let app = App::new(app_state.clone(), listener, None);
        let addr = app.local_addr()?;
        info!("Listening on {addr}");

        tokio::spawn(narocniki::serve(app));

        Ok(TestApp {
            addr,
            http_client: reqwest::Client::new(),
            app_state,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.http_client.get(self.url(path)).send().await?)
    }

    pub async fn post_subscriber(&self, body: &Value) -> Result<Response> {
        let res = self
            .http_client
            .post(self.url("/narocniki"))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn get_subscriber(&self, id: i32) -> Result<Response> {
        self.get(&format!("/narocniki/{id}")).await
    }

    pub async fn put_subscriber(&self, id: i32, body: &Value) -> Result<Response> {
        let res = self
            .http_client
            .put(self.url(&format!("/narocniki/{id}")))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn delete_subscriber(&self, id: i32) -> Result<Response> {
        let res = self
            .http_client
            .delete(self.url(&format!("/narocniki/{id}")))
            .send()
            .await?;
        Ok(res)
    }

    /// Creates a subscriber with generated names and the given score, asserting it succeeded.
    pub async fn create_scored_subscriber(&self, id: i32, score: &str) -> Result<()> {
        let res = self.post_subscriber(&subscriber_body(id, score)).await?;
        assert_eq!(res.status().as_u16(), 201, "failed to create subscriber {id}");
        Ok(())
    }
}

/// The Postgres server to run the store tests against, taken from `DATABASE_URL`.
/// Those tests are skipped when it is unset, so `cargo test` works without a database.
pub fn test_db_config() -> Result<Option<DbConfig>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Ok(Some(DbConfig::try_from(url.as_str())?)),
        Err(_) => {
            eprintln!("DATABASE_URL is not set, skipping the Postgres store test");
            Ok(None)
        }
    }
}

pub fn subscriber_body(id: i32, score: &str) -> Value {
    use fake::{
        faker::name::en::{FirstName, LastName},
        Fake,
    };

    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    json!({
        "id": id,
        "ime": first_name,
        "priimek": last_name,
        "uporabnisko_ime": format!("user{id}"),
        "ocena": score,
    })
}

/// The example subscriber used across the record endpoint tests.
pub fn nikolina() -> Value {
    json!({
        "id": 3,
        "ime": "Nikolina",
        "priimek": "Kraševka",
        "uporabnisko_ime": "nk_fuzine",
        "telefonska_stevilka": "999999999"
    })
}

/// Asserts the structured error body and returns its `detail`.
pub async fn assert_error_body(res: Response, status: u16, message: &str) -> Result<Value> {
    assert_eq!(res.status().as_u16(), status, "unexpected status code");
    assert!(
        res.headers().contains_key("x-request-id"),
        "error response is missing the request id"
    );

    let body: Value = res.json().await?;
    assert_eq!(body["error"]["message"], message);
    assert!(body["error"]["data"]["req_id"].is_string());

    Ok(body["error"]["data"]["detail"].clone())
}
