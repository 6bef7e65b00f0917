//! API configuration.

/// Default upload limit (1 GiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Allowed origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Request body limit, which bounds uploads
    pub max_upload_bytes: usize,
    /// `production` hides tool output in error responses
    pub environment: String,
    /// Serve Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            environment: "development".to_string(),
            metrics_enabled: true,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> Option<bool> {
    env_string(key).map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ApiConfig {
    /// Read `API_HOST`, `API_PORT`, `CORS_ORIGINS`, `MAX_UPLOAD_BYTES`,
    /// `ENVIRONMENT` and `METRICS_ENABLED`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cors_origins = env_string("CORS_ORIGINS")
            .map(|raw| split_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Self {
            host: env_string("API_HOST").unwrap_or(defaults.host),
            port: env_string("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins,
            max_upload_bytes: env_string("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .filter(|bytes| *bytes > 0)
                .unwrap_or(defaults.max_upload_bytes),
            environment: env_string("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: env_flag("METRICS_ENABLED").unwrap_or(defaults.metrics_enabled),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
