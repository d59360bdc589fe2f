//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RAGATE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::answer::{AnswerPolicies, CallPolicy};
use crate::constants::{
    DEFAULT_CACHE_TIMEOUT, DEFAULT_CACHE_VERSION, DEFAULT_EMBED_TIMEOUT,
    DEFAULT_GENERATION_MODEL, DEFAULT_GENERATION_TIMEOUT,
};

const REDIS_SCHEMES: [&str; 4] = ["redis", "rediss", "unix", "redis+unix"];

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAGATE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Directory scanned for corpus documents. Default: `.`.
    pub corpus_path: PathBuf,

    /// Sentence-embedding model directory (config, safetensors, tokenizer). Unset runs
    /// the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Generation model name. Default: `gpt-4o-mini`.
    pub generation_model: String,

    /// Directory of the persistent answer cache. Unset keeps answers in memory.
    pub cache_path: Option<PathBuf>,

    /// Redis URL of a shared answer cache (`redis://`, `rediss://` or `unix://`). Takes
    /// precedence over `cache_path`.
    pub redis_url: Option<String>,

    /// Max entries of the in-memory answer cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// Cache key version marker. Default: `v3`.
    pub cache_version: String,

    /// Per-attempt timeout for query embedding and search. Default: 10 s.
    pub embed_timeout: Duration,

    /// Per-attempt timeout for generation. Default: 60 s.
    pub generation_timeout: Duration,

    /// Timeout for each cache store call. Default: 500 ms.
    pub cache_timeout: Duration,

    /// Answer with the local mock generator instead of a hosted model.
    pub mock_provider: bool,

    /// Page served at `GET /` when it exists. Default: `index.html`.
    pub index_html: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
            corpus_path: PathBuf::from("."),
            model_path: None,
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            cache_path: None,
            redis_url: None,
            cache_capacity: 10_000,
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
            mock_provider: false,
            index_html: PathBuf::from("index.html"),
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "RAGATE_PORT";
    const ENV_BIND_ADDR: &'static str = "RAGATE_BIND_ADDR";
    const ENV_CORPUS_PATH: &'static str = "RAGATE_CORPUS_PATH";
    const ENV_MODEL_PATH: &'static str = "RAGATE_MODEL_PATH";
    const ENV_GENERATION_MODEL: &'static str = "RAGATE_GENERATION_MODEL";
    const ENV_CACHE_PATH: &'static str = "RAGATE_CACHE_PATH";
    const ENV_REDIS_URL: &'static str = "RAGATE_REDIS_URL";
    const ENV_CACHE_CAPACITY: &'static str = "RAGATE_CACHE_CAPACITY";
    const ENV_CACHE_VERSION: &'static str = "RAGATE_CACHE_VERSION";
    const ENV_EMBED_TIMEOUT_MS: &'static str = "RAGATE_EMBED_TIMEOUT_MS";
    const ENV_GENERATION_TIMEOUT_MS: &'static str = "RAGATE_GENERATION_TIMEOUT_MS";
    const ENV_CACHE_TIMEOUT_MS: &'static str = "RAGATE_CACHE_TIMEOUT_MS";
    const ENV_MOCK_PROVIDER: &'static str = "RAGATE_MOCK_PROVIDER";
    const ENV_INDEX_HTML: &'static str = "RAGATE_INDEX_HTML";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let corpus_path = Self::parse_path_from_env(Self::ENV_CORPUS_PATH, defaults.corpus_path);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let generation_model =
            Self::parse_string_from_env(Self::ENV_GENERATION_MODEL, defaults.generation_model);
        let cache_path = Self::parse_optional_path_from_env(Self::ENV_CACHE_PATH);
        let redis_url = Self::parse_optional_string_from_env(Self::ENV_REDIS_URL);
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity);
        let cache_version =
            Self::parse_string_from_env(Self::ENV_CACHE_VERSION, defaults.cache_version);
        let embed_timeout =
            Self::parse_millis_from_env(Self::ENV_EMBED_TIMEOUT_MS, defaults.embed_timeout);
        let generation_timeout = Self::parse_millis_from_env(
            Self::ENV_GENERATION_TIMEOUT_MS,
            defaults.generation_timeout,
        );
        let cache_timeout =
            Self::parse_millis_from_env(Self::ENV_CACHE_TIMEOUT_MS, defaults.cache_timeout);
        let mock_provider = env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty());
        let index_html = Self::parse_path_from_env(Self::ENV_INDEX_HTML, defaults.index_html);

        Ok(Self {
            port,
            bind_addr,
            corpus_path,
            model_path,
            generation_model,
            cache_path,
            redis_url,
            cache_capacity,
            cache_version,
            embed_timeout,
            generation_timeout,
            cache_timeout,
            mock_provider,
            index_html,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.corpus_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.corpus_path.clone(),
            });
        }
        if !self.corpus_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.corpus_path.clone(),
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if let Some(ref path) = self.cache_path
            && path.exists()
            && !path.is_dir()
        {
            return Err(ConfigError::NotADirectory { path: path.clone() });
        }

        if let Some(ref url) = self.redis_url
            && !REDIS_SCHEMES
                .iter()
                .any(|scheme| url.starts_with(&format!("{scheme}://")))
        {
            return Err(ConfigError::InvalidRedisUrl { value: url.clone() });
        }

        if self.cache_version.is_empty()
            || self
                .cache_version
                .contains(|c: char| c == ':' || c == '/' || c == '\\' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidCacheVersion {
                value: self.cache_version.clone(),
            });
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }

        for (name, timeout) in [
            (Self::ENV_EMBED_TIMEOUT_MS, self.embed_timeout),
            (Self::ENV_GENERATION_TIMEOUT_MS, self.generation_timeout),
            (Self::ENV_CACHE_TIMEOUT_MS, self.cache_timeout),
        ] {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout { name });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Call policies built from the configured timeouts.
    pub fn answer_policies(&self) -> AnswerPolicies {
        let defaults = AnswerPolicies::default();
        AnswerPolicies {
            retrieval: CallPolicy {
                timeout: self.embed_timeout,
                ..defaults.retrieval
            },
            generation: CallPolicy {
                timeout: self.generation_timeout,
                ..defaults.generation
            },
            cache: CallPolicy {
                timeout: self.cache_timeout,
                ..defaults.cache
            },
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_millis_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(default)
    }
}
