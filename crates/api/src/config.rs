/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
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
    /// Period of the expired-session sweep in seconds (default: `3600`).
    /// Zero disables the sweep.
    pub session_cleanup_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:4200` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `SESSION_CLEANUP_INTERVAL_SECS` | `3600`                  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:4200".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_cleanup_interval_secs: u64 = lookup("SESSION_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|| "3600".into())
            .parse()
            .expect("SESSION_CLEANUP_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session_cleanup_interval_secs,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full PostgreSQL connection URL.
    pub url: String,
    /// Maximum pool size (default: `20`).
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load database settings from environment variables.
    ///
    /// `DATABASE_URL` wins when set. Otherwise the URL is composed from
    /// `DB_HOST` (`localhost`), `DB_PORT` (`5432`), `DB_USERNAME`
    /// (`postgres`), `DB_PASSWORD` (required) and `DB_DATABASE`
    /// (`digitalpaper`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup("DATABASE_URL").unwrap_or_else(|| {
            let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".into());
            let port: u16 = lookup("DB_PORT")
                .unwrap_or_else(|| "5432".into())
                .parse()
                .expect("DB_PORT must be a valid u16");
            let username = lookup("DB_USERNAME").unwrap_or_else(|| "postgres".into());
            let password =
                lookup("DB_PASSWORD").expect("DB_PASSWORD must be set when DATABASE_URL is not");
            let database = lookup("DB_DATABASE").unwrap_or_else(|| "digitalpaper".into());
            format!("postgres://{username}:{password}@{host}:{port}/{database}")
        });

        let max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        Self {
            url,
            max_connections,
        }
    }
}
