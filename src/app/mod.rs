use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use metrics_exporter_prometheus::{PrometheusHandle, PrometheusRecorder};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, Environment, InfoConfig},
    database::DbManager,
    model::{PgSubscriberStore, SubscriberStore},
    web::{metrics::init_metrics_recorder, LogSink},
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    /// Pool to close once serving stops. `None` when the store is not Postgres backed.
    pub db_mgr: Option<DbManager>,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener, db_mgr: Option<DbManager>) -> Self {
        App {
            app_state,
            listener,
            db_mgr,
        }
    }

    /// Connects to the database, makes sure the schema exists and binds the listener.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let dm = DbManager::init(&config.db_config).await?;
        let log_sink = LogSink::init(&config.log_config).await?;

        let app_state = AppState::new(
            Box::new(PgSubscriberStore::new(dm.clone())),
            log_sink,
            config.info_config.clone(),
            config.environment,
        );

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener, Some(dm));
        Ok(app)
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

pub struct InternalState {
    pub store: Box<dyn SubscriberStore>,
    /// Only sees the record endpoints, see `web::metrics`.
    pub metrics_recorder: PrometheusRecorder,
    pub metrics_handle: PrometheusHandle,
    pub log_sink: LogSink,
    pub info: InfoConfig,
    pub environment: Environment,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        store: Box<dyn SubscriberStore>,
        log_sink: LogSink,
        info: InfoConfig,
        environment: Environment,
    ) -> Self {
        let (metrics_recorder, metrics_handle) = init_metrics_recorder();

        AppState(Arc::new(InternalState {
            store,
            metrics_recorder,
            metrics_handle,
            log_sink,
            info,
            environment,
        }))
    }
}
