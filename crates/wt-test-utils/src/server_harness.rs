//! Test server harness for E2E testing
//!
//! Provides `TestWtServer` for spawning real warm transfer server instances
//! in tests.

use crate::fixtures::{signing_vars, unconfigured_vars};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use wt_service::config::Config;
use wt_service::observability::metrics::init_metrics_recorder;
use wt_service::routes::{self, AppState};
use wt_service::services::{LlmClient, LlmClientTrait};

/// Global metrics handle shared by every test server in the process.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder().unwrap_or_else(|_| {
                metrics_exporter_prometheus::PrometheusBuilder::new()
                    .build_recorder()
                    .handle()
            })
        })
        .clone()
}

/// Test harness for spawning the warm transfer server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() -> Result<()> {
///     let server = TestWtServer::spawn().await?;
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestWtServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestWtServer {
    /// Spawn a server that can sign room tokens but has no provider key.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(signing_vars()).await
    }

    /// Spawn a server with no integration credentials.
    pub async fn spawn_unconfigured() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(unconfigured_vars()).await
    }

    /// Spawn a server from an explicit variable map.
    ///
    /// A real `LlmClient` is built when `OPENAI_API_KEY` is present.
    pub async fn spawn_with_vars(vars: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let llm_client = LlmClient::from_config(&config)
            .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?
            .map(|client| Arc::new(client) as Arc<dyn LlmClientTrait>);

        Self::start(config, llm_client).await
    }

    /// Spawn a signing-capable server that summarizes through `llm_client`.
    pub async fn spawn_with_llm_client(
        llm_client: Arc<dyn LlmClientTrait>,
    ) -> Result<Self, anyhow::Error> {
        let config = Config::from_vars(&signing_vars())
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        Self::start(config, Some(llm_client)).await
    }

    async fn start(
        config: Config,
        llm_client: Option<Arc<dyn LlmClientTrait>>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState {
            config: config.clone(),
            llm_client,
        });

        let app = routes::build_routes(state, test_metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestWtServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
