//! # Client Configuration
//!
//! Settings for the HTTP backend and the CLI, loaded from an optional TOML
//! file and then from environment variables. Environment wins.
//!
//! | Variable                     | Default                                         |
//! |------------------------------|-------------------------------------------------|
//! | `CARWASH_API_BASE_URL`       | `https://api.stg.2025.dwash.cood2.dussur.sa/api`|
//! | `CARWASH_LANGUAGE`           | `ar`                                            |
//! | `CARWASH_PAYMENT_METHOD_ID`  | `2`                                             |
//! | `CARWASH_HTTP_TIMEOUT_SECS`  | `30`                                            |
//! | `CARWASH_MAX_RETRIES`        | `1` (capped at 3)                               |
//! | `CARWASH_SESSION_FILE`       | `~/.carwash/session.json`                       |
//! | `CARWASH_CALLBACK_ADDR`      | `127.0.0.1:8765`                                |
//! | `CARWASH_CONFIG`             | `config/carwash.toml`                           |

use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wash_core::{BookingError, BookingResult, Language, CARD_PAYMENT_METHOD_ID};

/// Staging API
pub const DEFAULT_API_BASE_URL: &str = "https://api.stg.2025.dwash.cood2.dussur.sa/api";

/// Upper bound for automatic retries
pub const MAX_RETRIES_CAP: u32 = 3;

const DEFAULT_CONFIG_FILE: &str = "config/carwash.toml";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash
    pub api_base_url: String,

    /// Language for toasts and the `language` auth parameter
    pub language: Language,

    pub payment_method_id: i64,

    /// Per-request timeout
    pub timeout: Duration,

    /// Automatic retries on network failures, at most [`MAX_RETRIES_CAP`]
    pub max_retries: u32,

    /// Where the session token is persisted
    pub session_file: PathBuf,

    /// Loopback address the payment page redirects back to
    pub callback_addr: SocketAddr,
}

/// Keys accepted in `carwash.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub language: Option<String>,
    pub payment_method_id: Option<i64>,
    pub http_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub session_file: Option<PathBuf>,
    pub callback_addr: Option<String>,
}

impl FileConfig {
    /// Parse a TOML document
    pub fn parse(content: &str) -> BookingResult<Self> {
        toml::from_str(content).map_err(|e| BookingError::Configuration(format!("invalid config file: {}", e)))
    }

    /// Read `path`; a missing file yields the empty config
    pub fn load(path: &Path) -> BookingResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(BookingError::Configuration(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the config file and environment variables.
    pub fn from_env() -> BookingResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let path = env::var("CARWASH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let file = FileConfig::load(Path::new(&path))?;
        Self::resolve(file, |key| env::var(key).ok())
    }

    /// Merge a file config with an environment lookup
    pub fn resolve(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> BookingResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = var("CARWASH_API_BASE_URL")
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(BookingError::Configuration(
                "CARWASH_API_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        let language = match var("CARWASH_LANGUAGE").or(file.language) {
            Some(raw) => raw.parse::<Language>().map_err(BookingError::Configuration)?,
            None => Language::default(),
        };

        let payment_method_id = match var("CARWASH_PAYMENT_METHOD_ID") {
            Some(raw) => parse_number("CARWASH_PAYMENT_METHOD_ID", &raw)?,
            None => file.payment_method_id.unwrap_or(CARD_PAYMENT_METHOD_ID),
        };

        let timeout_secs: u64 = match var("CARWASH_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_number("CARWASH_HTTP_TIMEOUT_SECS", &raw)?,
            None => file.http_timeout_secs.unwrap_or(30),
        };
        if timeout_secs == 0 {
            return Err(BookingError::Configuration(
                "CARWASH_HTTP_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        let max_retries: u32 = match var("CARWASH_MAX_RETRIES") {
            Some(raw) => parse_number("CARWASH_MAX_RETRIES", &raw)?,
            None => file.max_retries.unwrap_or(1),
        };

        let session_file = var("CARWASH_SESSION_FILE")
            .map(PathBuf::from)
            .or(file.session_file)
            .unwrap_or_else(|| default_session_file(lookup("HOME")));

        let callback_addr = match var("CARWASH_CALLBACK_ADDR").or(file.callback_addr) {
            Some(raw) => raw.parse().map_err(|_| {
                BookingError::Configuration(format!("CARWASH_CALLBACK_ADDR is not a socket address: {}", raw))
            })?,
            None => SocketAddr::from(([127, 0, 0, 1], 8765)),
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            language,
            payment_method_id,
            timeout: Duration::from_secs(timeout_secs),
            max_retries: max_retries.min(MAX_RETRIES_CAP),
            session_file,
            callback_addr,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            language: Language::default(),
            payment_method_id: CARD_PAYMENT_METHOD_ID,
            timeout: Duration::from_secs(30),
            max_retries: 1,
            session_file: default_session_file(env::var("HOME").ok()),
            callback_addr: SocketAddr::from(([127, 0, 0, 1], 8765)),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: retries, capped at [`MAX_RETRIES_CAP`]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.min(MAX_RETRIES_CAP);
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> BookingResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| BookingError::Configuration(format!("{} is not a valid number: {}", key, raw)))
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".carwash")
        .join("session.json")
}
