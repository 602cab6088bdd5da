use crate::auth::jwt::JwtConfig;

/// Exchange business timings.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Hours until a PROPOSED match expires (default: `48`).
    pub match_expiry_hours: i64,
    /// Days until an OPEN listing expires (default: `30`).
    pub listing_expiry_days: i64,
    /// Minutes until a verification PIN expires (default: `10`).
    pub pin_expiry_minutes: i64,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Business timings for listings, matches, and verification PINs.
    pub exchange: ExchangeConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MATCH_EXPIRY_HOURS`   | `48`                       |
    /// | `LISTING_EXPIRY_DAYS`  | `30`                       |
    /// | `PIN_EXPIRY_MINUTES`   | `10`                       |
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

        let match_expiry_hours: i64 = std::env::var("MATCH_EXPIRY_HOURS")
            .unwrap_or_else(|_| "48".into())
            .parse()
            .expect("MATCH_EXPIRY_HOURS must be a valid i64");

        let listing_expiry_days: i64 = std::env::var("LISTING_EXPIRY_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("LISTING_EXPIRY_DAYS must be a valid i64");

        let pin_expiry_minutes: i64 = std::env::var("PIN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("PIN_EXPIRY_MINUTES must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            exchange: ExchangeConfig {
                match_expiry_hours,
                listing_expiry_days,
                pin_expiry_minutes,
            },
        }
    }
}
