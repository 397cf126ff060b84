use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub rest_api: RestApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    /// Base URL every endpoint path is appended to, e.g. `https://host/api`.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Prefix for media links built by [`crate::utils::storage_url::storage_url`].
    pub media_url: String,
    /// File the session mirror is written to.
    pub session_file: String,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"rest_api\":{},\"storage\":{}}}",
            self.rest_api, self.storage
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"media_url\":\"{}\",\"session_file\":\"{}\"}}",
            self.media_url, self.session_file
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            rest_api: RestApiConfig {
                base_url: get_env_or_default(
                    "INVEST_REST_BASE_URL",
                    String::from("http://localhost/api"),
                ),
                timeout: get_env_or_default("INVEST_REST_TIMEOUT", 30),
            },
            storage: StorageConfig {
                media_url: get_env_or_default("INVEST_MEDIA_URL", String::from("/media")),
                session_file: get_env_or_default(
                    "INVEST_SESSION_FILE",
                    String::from(".invest-session.json"),
                ),
            },
        }
    }

    /// Same as [`Config::new`] but pointed at `base_url`, which is handy against a local
    /// gateway or a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Self::new();
        config.rest_api.base_url = base_url.trim_end_matches('/').to_string();
        config
    }
}
