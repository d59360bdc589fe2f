//! In-process server harness: a temp corpus, the stub embedder, and a real listener.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ragate::cache::{CacheGate, CacheStore};
use ragate::gateway::{HandlerState, create_router_with_state};
use ragate::generation::Generator;
use ragate::{
    AnswerService, Chunker, CorpusLoader, LoadReport, SentenceConfig, SentenceEmbedder,
    SharedEmbedder, initialize_index,
};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

/// Documents written into the server's corpus directory before startup.
#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub documents: Vec<(String, Vec<u8>)>,
    pub index_html: Option<String>,
}

impl TestServerConfig {
    pub fn with_document(mut self, name: &str, contents: impl AsRef<[u8]>) -> Self {
        self.documents
            .push((name.to_string(), contents.as_ref().to_vec()));
        self
    }

    pub fn with_index_html(mut self, html: &str) -> Self {
        self.index_html = Some(html.to_string());
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub report: LoadReport,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _corpus_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn corpus_dir(&self) -> PathBuf {
        self._corpus_dir.path().to_path_buf()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => tokio::time::sleep(interval).await,
        }
    }
}

fn stub_embedder() -> Result<SharedEmbedder, ServerStartupError> {
    let embedder = SentenceEmbedder::load(SentenceConfig::stub())
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    Ok(Arc::new(embedder))
}

/// Spawns a server on an ephemeral port over a fresh corpus directory.
///
/// The corpus is indexed with the stub embedder. The cache store and generator are
/// supplied by the caller so tests can keep handles to them.
pub async fn spawn_test_server<S, G>(
    config: TestServerConfig,
    store: S,
    generator: G,
) -> Result<TestServer, ServerStartupError>
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    let corpus_dir =
        TempDir::new().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    for (name, contents) in &config.documents {
        std::fs::write(corpus_dir.path().join(name), contents)?;
    }
    let index_html = corpus_dir.path().join("index.html.served");
    if let Some(html) = &config.index_html {
        std::fs::write(&index_html, html)?;
    }

    let loader = CorpusLoader::new(corpus_dir.path());
    let (index, report) = initialize_index(&loader, &Chunker::default(), stub_embedder()?)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let service = AnswerService::new(Arc::new(index), CacheGate::new(store), generator);
    let state = HandlerState::new(Arc::new(service), index_html);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr,
        report,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _corpus_dir: corpus_dir,
    })
}
