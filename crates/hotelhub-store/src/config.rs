//! Record store configuration.

use std::env;

use crate::error::StoreError;

/// Configuration for connecting to the hosted record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the record store API (e.g. `https://records.example.com`).
    pub base_url: String,
    /// Project the tables belong to.
    pub project_id: String,
    /// Public API key sent as a bearer token.
    pub public_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            project_id: String::new(),
            public_key: String::new(),
        }
    }
}

impl StoreConfig {
    pub const URL_VAR: &'static str = "HOTELHUB_STORE_URL";
    pub const PROJECT_VAR: &'static str = "HOTELHUB_PROJECT_ID";
    pub const KEY_VAR: &'static str = "HOTELHUB_PUBLIC_KEY";

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable lookup. The project id
    /// and key are required; the URL falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let defaults = Self::default();
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StoreError::Config(format!("{name} is not set")))
        };

        Ok(Self {
            base_url: lookup(Self::URL_VAR)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            project_id: required(Self::PROJECT_VAR)?,
            public_key: required(Self::KEY_VAR)?,
        })
    }
}
