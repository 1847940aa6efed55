use std::path::PathBuf;
use std::time::Duration;

use dci_db::repositories::GrantRole;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. `DATABASE_URL`
/// is read separately in `main.rs`; converter settings live in
/// [`dci_convert::ConvertConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Must exceed the
    /// conversion timeout so slow jobs report their own error.
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Deadline for one search query (default: `10`).
    pub search_timeout_secs: u64,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Maximum multipart upload size in bytes.
    pub max_upload_bytes: usize,
    /// Connection used for reload; falls back to the main pool.
    pub reload_database_url: Option<String>,
    /// Role granted read access to the `dci` schema after each reload.
    pub web_role: Option<GrantRole>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `120`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `SEARCH_TIMEOUT_SECS`   | `10`                       |
    /// | `STATIC_DIR`            | `static`                   |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                 |
    /// | `RELOAD_DATABASE_URL`   | unset                      |
    /// | `WEB_ROLE`              | unset                      |
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
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let search_timeout_secs: u64 = std::env::var("SEARCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SEARCH_TIMEOUT_SECS must be a valid u64");

        let static_dir = PathBuf::from(
            std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
        );

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let reload_database_url = std::env::var("RELOAD_DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let web_role = std::env::var("WEB_ROLE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|role| {
                GrantRole::parse(role.trim()).unwrap_or_else(|e| panic!("WEB_ROLE: {e}"))
            });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            search_timeout_secs,
            static_dir,
            max_upload_bytes,
            reload_database_url,
            web_role,
        }
    }

    /// The request timeout must be strictly longer than `conversion_deadline`.
    pub fn check_conversion_deadline(&self, conversion_deadline: Duration) -> Result<(), String> {
        let request_timeout = Duration::from_secs(self.request_timeout_secs);
        if request_timeout > conversion_deadline {
            Ok(())
        } else {
            Err(format!(
                "REQUEST_TIMEOUT_SECS ({}) must exceed the conversion deadline ({}s)",
                self.request_timeout_secs,
                conversion_deadline.as_secs_f64(),
            ))
        }
    }
}
