pub const RAGATE_STATUS_HEADER: &str = "X-Ragate-Status";
pub const RAGATE_STATUS_HEALTHY: &str = "healthy";
pub const RAGATE_STATUS_READY: &str = "ready";
pub const RAGATE_STATUS_NOT_READY: &str = "not_ready";
pub const RAGATE_STATUS_ERROR: &str = "error";

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Served from the answer cache.
    Cache,
    /// Produced by the generation backend on this request.
    Generated,
}

impl Provenance {
    /// Value of the `origem` field in `/ask` responses.
    #[inline]
    pub fn as_origin(&self) -> &'static str {
        match self {
            Provenance::Cache => "cache_redis",
            Provenance::Generated => "openai_api",
        }
    }

    /// Value of the status header.
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            Provenance::Cache => "HIT",
            Provenance::Generated => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Provenance::Cache)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}
