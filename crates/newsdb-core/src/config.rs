//! Configuration loader, retrieval settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! `APP_RETRIEVAL__TOP_K=5` overrides `retrieval.top_k`.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        let settings = config.settings()?;
        settings.validate()?;
        tracing::debug!(env = %env_name, store = %settings.store.uri, table = %settings.store.table, "configuration loaded");
        Ok(config)
    }

    /// Build a config from an explicit figment, bypassing file discovery.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed settings; every missing key falls back to its default.
    pub fn settings(&self) -> anyhow::Result<RetrievalSettings> {
        Ok(RetrievalSettings { store: self.section("store")?, retrieval: self.section("retrieval")? })
    }

    fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() { return Ok(T::default()); }
        self.get(key)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    pub uri: String,
    pub table: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { uri: "../dev_data/lancedb".to_string(), table: "articles".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrievalSection {
    pub load_limit: usize,
    pub top_k: usize,
    pub context_articles: usize,
    pub store_timeout_ms: u64,
    pub encoder_timeout_ms: u64,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self { load_limit: 1000, top_k: 3, context_articles: 3, store_timeout_ms: 10_000, encoder_timeout_ms: 5_000 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalSettings {
    pub store: StoreSettings,
    pub retrieval: RetrievalSection,
}

impl RetrievalSettings {
    pub fn validate(&self) -> crate::error::Result<()> {
        let r = &self.retrieval;
        if r.load_limit == 0 { return Err(Error::InvalidConfig("retrieval.load_limit must be > 0".into())); }
        if r.top_k == 0 { return Err(Error::InvalidConfig("retrieval.top_k must be > 0".into())); }
        if r.store_timeout_ms == 0 || r.encoder_timeout_ms == 0 {
            return Err(Error::InvalidConfig("retrieval timeouts must be > 0".into()));
        }
        if self.store.table.trim().is_empty() { return Err(Error::InvalidConfig("store.table is empty".into())); }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration { Duration::from_millis(self.retrieval.store_timeout_ms) }

    pub fn encoder_timeout(&self) -> Duration { Duration::from_millis(self.retrieval.encoder_timeout_ms) }

    /// Store location with `~` and env vars expanded, relative to `base`.
    pub fn store_path(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.store.uri) }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
