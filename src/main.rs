//! Ragate HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use ragate::answer::AnswerService;
use ragate::cache::{CacheGate, CacheStore, FileStore, MemoryStore, RedisStore};
use ragate::chunking::Chunker;
use ragate::config::Config;
use ragate::corpus::{CorpusLoader, initialize_index};
use ragate::embedding::{SentenceConfig, SentenceEmbedder, SharedEmbedder};
use ragate::gateway::{HandlerState, create_router_with_state};
use ragate::generation::{GenaiGenerator, Generator, MockGenerator};
use ragate::index::CorpusIndex;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    println!(
        r#"
██████╗  █████╗  ██████╗  █████╗ ████████╗███████╗
██╔══██╗██╔══██╗██╔════╝ ██╔══██╗╚══██╔══╝██╔════╝
██████╔╝███████║██║  ███╗███████║   ██║   █████╗
██╔══██╗██╔══██║██║   ██║██╔══██║   ██║   ██╔══╝
██║  ██║██║  ██║╚██████╔╝██║  ██║   ██║   ███████╗
╚═╝  ╚═╝╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚══════╝

        ASK ONCE. ANSWER FROM CACHE.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    // The probe builds its own runtime, so the server runtime starts only after it.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        corpus = %config.corpus_path.display(),
        "Ragate starting"
    );

    let sentence_config = if let Some(path) = &config.model_path {
        SentenceConfig::new(path.clone())
    } else {
        tracing::warn!("No RAGATE_MODEL_PATH configured, running embedder in stub mode");
        SentenceConfig::stub()
    };
    let embedder: SharedEmbedder = Arc::new(SentenceEmbedder::load(sentence_config)?);

    let loader = CorpusLoader::new(config.corpus_path.clone());
    let (index, report) = tokio::task::spawn_blocking(move || {
        initialize_index(&loader, &Chunker::default(), embedder)
    })
    .await??;

    report.log_summary();
    if !index.is_ready() {
        tracing::warn!(
            corpus = %config.corpus_path.display(),
            "NOT READY: no documents were indexed; /ask will answer 503 until documents are added and the server restarted"
        );
    }
    let index = Arc::new(index);

    if let Some(url) = &config.redis_url {
        let store = RedisStore::open(url)?;
        if config.cache_path.is_some() {
            tracing::warn!("RAGATE_REDIS_URL and RAGATE_CACHE_PATH both set; using redis");
        }
        tracing::info!(store = ?store, "Using redis cache store");
        return with_generator(config, index, store).await;
    }

    match &config.cache_path {
        Some(path) => {
            let store = FileStore::open(path.clone())?;
            tracing::info!(path = %path.display(), "Using persistent file cache store");
            with_generator(config, index, store).await
        }
        None => {
            let store = MemoryStore::with_capacity(config.cache_capacity);
            tracing::info!(capacity = config.cache_capacity, "Using in-memory cache store");
            with_generator(config, index, store).await
        }
    }
}

async fn with_generator<S>(config: Config, index: Arc<CorpusIndex>, store: S) -> anyhow::Result<()>
where
    S: CacheStore + Clone + 'static,
{
    if config.mock_provider {
        tracing::warn!("RAGATE_MOCK_PROVIDER set, answers come from the mock generator");
        serve(config, index, store, MockGenerator::echo()).await
    } else {
        let generator = GenaiGenerator::new(config.generation_model.clone());
        serve(config, index, store, generator).await
    }
}

async fn serve<S, G>(
    config: Config,
    index: Arc<CorpusIndex>,
    store: S,
    generator: G,
) -> anyhow::Result<()>
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        model = generator.model(),
        cache_store = store.name(),
        cache_version = %config.cache_version,
        "Answer service configured"
    );

    let gate = CacheGate::new(store).with_version(config.cache_version.clone());
    let service = AnswerService::new(index, gate, generator).with_policies(config.answer_policies());
    let state = HandlerState::new(Arc::new(service), config.index_html.clone());

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Ragate shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
