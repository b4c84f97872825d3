/// Server configuration loaded from environment variables.
///
/// All fields except the identity key have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// AES-256 key for identity documents, as 64 hex characters.
    pub identity_key_hex: String,
    /// Property time zone as minutes east of UTC. Host local time when unset.
    pub property_utc_offset_minutes: Option<i32>,
    /// Emit one JSON object per log line instead of human-readable text.
    pub log_json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                    |
    /// |-------------------------------|----------------------------|
    /// | `HOST`                        | `0.0.0.0`                  |
    /// | `PORT`                        | `3000`                     |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                       |
    /// | `IDENTITY_KEY_HEX`            | required                   |
    /// | `PROPERTY_UTC_OFFSET_MINUTES` | host local time            |
    /// | `LOG_FORMAT`                  | `text` (`json` to switch)  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let identity_key_hex =
            std::env::var("IDENTITY_KEY_HEX").expect("IDENTITY_KEY_HEX must be set");

        let property_utc_offset_minutes: Option<i32> = std::env::var("PROPERTY_UTC_OFFSET_MINUTES")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .expect("PROPERTY_UTC_OFFSET_MINUTES must be a valid i32")
            });

        let log_json = match std::env::var("LOG_FORMAT") {
            Ok(format) => match format.trim() {
                "json" => true,
                "" | "text" => false,
                other => panic!("LOG_FORMAT must be `text` or `json`, got `{other}`"),
            },
            Err(_) => false,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            identity_key_hex,
            property_utc_offset_minutes,
            log_json,
        }
    }
}
