//! Client configuration: API key, base URL and verbosity.
//!
//! Values can be given in code or read from the process environment; `dotenv`
//! is loaded on demand by the binary and the demos.
use std::env;
use reqwest::header::HeaderValue;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "https://api.apiframe.pro";

#[derive(Clone)]
pub struct Config {
    api_key: String,
    base_url: String,
    verbose: bool,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    /// Build a config for `api_key`, failing fast if it is empty or not a
    /// usable header value.
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::Config("The api key is required".to_string()));
        }
        if HeaderValue::from_str(&api_key).is_err() {
            return Err(AppError::Config("The api key contains characters not allowed in an HTTP header".to_string()));
        }
        Ok(Config {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
        })
    }

    /// Read `APIFRAME_API_KEY`, `APIFRAME_BASE_URL` and `APIFRAME_VERBOSE`.
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with_key(None)
    }

    /// Like [`Config::from_env`], but `api_key` (when given) replaces
    /// `APIFRAME_API_KEY`; the base URL and verbosity still come from the env.
    pub fn from_env_with_key(api_key: Option<String>) -> AppResult<Self> {
        Self::from_lookup(api_key, |name| env::var(name).ok())
    }

    fn from_lookup(api_key: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_key = api_key
            .or_else(|| lookup("APIFRAME_API_KEY"))
            .ok_or_else(|| AppError::Config("APIFRAME_API_KEY is not set".to_string()))?;
        let mut config = Config::new(api_key)?;
        if let Some(url) = lookup("APIFRAME_BASE_URL") {
            config = config.with_base_url(url);
        }
        let verbose = lookup("APIFRAME_VERBOSE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Ok(config.with_verbose(verbose))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn print_env_vars() {
        let key = env::var("APIFRAME_API_KEY").map(|k| mask_key(&k)).unwrap_or_else(|_| "<unset>".to_string());
        println!("APIFRAME_API_KEY: {}", key);
        println!("APIFRAME_BASE_URL: {}", env::var("APIFRAME_BASE_URL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("APIFRAME_VERBOSE: {}", env::var("APIFRAME_VERBOSE").unwrap_or_else(|_| "<unset>".to_string()));
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &mask_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("verbose", &self.verbose)
            .finish()
    }
}

fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(Config::new(""), Err(AppError::Config(_))));
        assert!(matches!(Config::new("   "), Err(AppError::Config(_))));
    }

    #[test]
    fn key_with_newline_is_rejected() {
        assert!(matches!(Config::new("abc\ndef"), Err(AppError::Config(_))));
    }

    #[test]
    fn defaults_and_builders() {
        let cfg = Config::new("key-123").unwrap();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert!(!cfg.verbose());

        let cfg = cfg.with_base_url("http://localhost:9000/").with_verbose(true);
        assert_eq!(cfg.base_url(), "http://localhost:9000");
        assert!(cfg.verbose());
        assert_eq!(cfg.api_key(), "key-123");
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn explicit_key_keeps_env_base_url_and_verbose() {
        let env = vars(&[
            ("APIFRAME_API_KEY", "env-key"),
            ("APIFRAME_BASE_URL", "http://proxy.internal:8080/"),
            ("APIFRAME_VERBOSE", "1"),
        ]);
        let cfg = Config::from_lookup(Some("flag-key".to_string()), env).unwrap();
        assert_eq!(cfg.api_key(), "flag-key");
        assert_eq!(cfg.base_url(), "http://proxy.internal:8080");
        assert!(cfg.verbose());
    }

    #[test]
    fn env_only_and_missing_key() {
        let cfg = Config::from_lookup(None, vars(&[("APIFRAME_API_KEY", "env-key")])).unwrap();
        assert_eq!(cfg.api_key(), "env-key");
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert!(!cfg.verbose());

        let err = Config::from_lookup(None, vars(&[("APIFRAME_BASE_URL", "http://x")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn debug_output_masks_key() {
        let cfg = Config::new("secret-api-key").unwrap();
        let out = format!("{:?}", cfg);
        assert!(out.contains("secr****"));
        assert!(!out.contains("secret-api-key"));
    }
}
