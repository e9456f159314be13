//! # Configuration Management
//!
//! The gateway is configured through an explicit [`Config`] value handed to
//! [`AudioGateway::new`](crate::handlers::AudioGateway::new). The core never
//! reads worker bindings or vars on its own.
//!
//! ## Configuration Sources
//!
//! 1. **Worker vars**: `ALLOWED_ORIGINS`, `AUDIO_KEY_PREFIX`, `AUDIO_CACHE_CONTROL`, `CORS_MAX_AGE`
//! 2. **Defaults**: used for every var that is missing or unusable
//!
//! ## Example
//!
//! ```text
//! # wrangler.toml
//! [vars]
//! ALLOWED_ORIGINS = "https://app.example.com https://www.example.com"
//! AUDIO_KEY_PREFIX = "audio/"
//! ```

use serde::Serialize;
use worker::{console_log, console_warn, Env};

use crate::constants::{
    AUDIO_BUCKET_NAME, DEFAULT_CACHE_CONTROL, DEFAULT_CORS_MAX_AGE, VAR_ALLOWED_ORIGINS,
    VAR_CACHE_CONTROL, VAR_CORS_MAX_AGE, VAR_KEY_PREFIX,
};
use crate::cors::CorsPolicy;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Config {
    /// Name of the R2 bucket binding holding the audio objects.
    /// Must match the binding name in wrangler.toml.
    pub bucket_binding: String,

    /// Raw origin allow-list, whitespace or comma separated. `None` reflects
    /// any origin; an entry of `*` allows all.
    pub allowed_origins: Option<String>,

    /// Prepended to `<fileId>.<ext>` to form the bucket key.
    pub key_prefix: String,

    /// `Cache-Control` sent with every found object.
    pub cache_control: String,

    /// Preflight cache lifetime in seconds.
    pub cors_max_age: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_binding: AUDIO_BUCKET_NAME.to_string(),
            allowed_origins: None,
            key_prefix: String::new(),
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
            cors_max_age: DEFAULT_CORS_MAX_AGE,
        }
    }
}

impl Config {
    /// Builds a configuration from a var lookup, keeping defaults for
    /// anything missing or unparseable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            bucket_binding: defaults.bucket_binding,
            allowed_origins: non_blank(VAR_ALLOWED_ORIGINS),
            key_prefix: lookup(VAR_KEY_PREFIX).unwrap_or(defaults.key_prefix),
            cache_control: non_blank(VAR_CACHE_CONTROL).unwrap_or(defaults.cache_control),
            cors_max_age: non_blank(VAR_CORS_MAX_AGE)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.cors_max_age),
        }
    }

    /// Loads configuration from the worker's vars.
    pub fn from_env(env: &Env) -> Self {
        let lookup = |name: &str| env.var(name).ok().map(|var| var.to_string());

        if let Some(raw) = lookup(VAR_CORS_MAX_AGE) {
            if raw.trim().parse::<u32>().is_err() {
                console_warn!("Ignoring invalid {} value {:?}, using default", VAR_CORS_MAX_AGE, raw);
            }
        }

        let config = Self::from_lookup(lookup);
        console_log!(
            "Configuration loaded from worker vars: {}",
            serde_json::to_string(&config).unwrap_or_default()
        );
        config
    }

    pub fn cors_policy(&self) -> CorsPolicy {
        CorsPolicy::from_allow_list(self.allowed_origins.as_deref(), self.cors_max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn serializes_for_startup_log() {
        let value = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(value["bucket_binding"], "AUDIO_BUCKET");
        assert_eq!(value["allowed_origins"], serde_json::Value::Null);
        assert_eq!(value["cors_max_age"], 86_400);
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(Config::from_lookup(lookup_from(&[])), Config::default());
    }

    #[test]
    fn reads_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("ALLOWED_ORIGINS", "https://a.com https://b.com"),
            ("AUDIO_KEY_PREFIX", "audio/"),
            ("AUDIO_CACHE_CONTROL", "public, max-age=60"),
            ("CORS_MAX_AGE", "600"),
        ]));
        assert_eq!(config.allowed_origins.as_deref(), Some("https://a.com https://b.com"));
        assert_eq!(config.key_prefix, "audio/");
        assert_eq!(config.cache_control, "public, max-age=60");
        assert_eq!(config.cors_max_age, 600);
        assert_eq!(
            config.cors_policy(),
            CorsPolicy::from_allow_list(Some("https://a.com,https://b.com"), 600)
        );
    }

    #[test]
    fn invalid_max_age_and_blank_origins_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("ALLOWED_ORIGINS", "   "),
            ("CORS_MAX_AGE", "a day"),
        ]));
        assert_eq!(config.allowed_origins, None);
        assert_eq!(config.cors_max_age, DEFAULT_CORS_MAX_AGE);
    }
}
