// src/config/options.rs
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::data::{CategorySource, SourceMode};
use crate::error::SetupError;

/// Everything one run needs, passed explicitly to each component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scrape: ScrapeOptions,
    pub net: NetOptions,
    pub links: LinkOptions,
    pub output: OutputOptions,
    pub notify: NotifyOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrape: ScrapeOptions::default(),
            net: NetOptions::default(),
            links: LinkOptions::default(),
            output: OutputOptions::default(),
            notify: NotifyOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub mode: SourceMode,
    pub sources: Vec<CategorySource>,
    /// Display order of categories; unknown keys go last.
    pub category_order: Vec<String>,
    pub limit: usize,
    pub min_accept: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            mode: SourceMode::Live,
            sources: DEFAULT_SOURCES.iter().map(|(k, u)| CategorySource::new(*k, *u)).collect(),
            category_order: DEFAULT_CATEGORY_ORDER.iter().map(|k| k.to_string()).collect(),
            limit: LIMIT,
            min_accept: MIN_ACCEPT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetOptions {
    pub mirror_first: bool,
    pub mirror_prefix: String,
    pub max_retries: u32,
    pub retry_base_ms: u64,
    pub delay_between_categories_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            mirror_first: MIRROR_FIRST,
            mirror_prefix: MIRROR_PREFIX.to_string(),
            max_retries: MAX_RETRIES,
            retry_base_ms: RETRY_BASE_MS,
            delay_between_categories_ms: DELAY_BETWEEN_CATEGORIES_MS,
            timeout_secs: HTTP_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    pub product_base_url: String,
    pub affiliate_tag: Option<String>,
    /// Prefix for `/r/<id>/` links in the go pages; empty means site-relative.
    pub public_base_url: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            product_base_url: PRODUCT_BASE_URL.to_string(),
            affiliate_tag: None,
            public_base_url: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub data_dir: PathBuf,
    pub seed_file: PathBuf,
    pub site_dir: PathBuf,
    pub publish: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            seed_file: PathBuf::from(SEED_FILE),
            site_dir: PathBuf::from(SITE_DIR),
            publish: true,
        }
    }
}

impl OutputOptions {
    pub fn run_file(&self) -> PathBuf {
        self.data_dir.join(RUN_FILE)
    }

    pub fn links_file(&self) -> PathBuf {
        self.data_dir.join(LINKS_FILE)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyOptions {
    /// Absent endpoint disables notification.
    pub webhook_url: Option<String>,
}

impl Config {
    /// Load from `path` if given (must exist), else from `shelfscan.toml` in the
    /// working directory if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SetupError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .map_err(|source| SetupError::ConfigRead { path: path.clone(), source })?;
        Self::from_toml(&text).map_err(|source| SetupError::ConfigParse { path, source })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply `AFFIL_TAG` / `DISCORD_WEBHOOK`. Blank values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(tag) = non_blank(ENV_AFFILIATE_TAG) {
            self.links.affiliate_tag = Some(tag);
        }
        if let Some(url) = non_blank(ENV_WEBHOOK) {
            self.notify.webhook_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        let s = &self.scrape;
        if s.sources.is_empty() {
            return Err(SetupError::Invalid("no category sources configured".into()));
        }
        let mut seen = HashSet::new();
        for src in &s.sources {
            if src.key.trim().is_empty() {
                return Err(SetupError::Invalid("category key must not be blank".into()));
            }
            if !seen.insert(src.key.as_str()) {
                return Err(SetupError::Invalid(format!("duplicate category key '{}'", src.key)));
            }
            if s.mode == SourceMode::Live && src.url.trim().is_empty() {
                return Err(SetupError::Invalid(format!("category '{}' has no url", src.key)));
            }
        }
        if s.limit == 0 {
            return Err(SetupError::Invalid("limit must be at least 1".into()));
        }
        if s.min_accept > s.limit {
            return Err(SetupError::Invalid(format!(
                "min_accept ({}) exceeds limit ({})",
                s.min_accept, s.limit
            )));
        }
        if self.net.max_retries == 0 {
            return Err(SetupError::Invalid("max_retries must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.scrape.limit, 10);
        assert_eq!(cfg.scrape.min_accept, 5);
        assert_eq!(cfg.net.max_retries, 2);
        assert!(cfg.notify.webhook_url.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            [scrape]
            limit = 20
            mode = "curated"

            [net]
            mirror_first = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scrape.limit, 20);
        assert_eq!(cfg.scrape.min_accept, MIN_ACCEPT);
        assert_eq!(cfg.scrape.mode, SourceMode::Curated);
        assert!(!cfg.net.mirror_first);
        assert_eq!(cfg.net.retry_base_ms, RETRY_BASE_MS);
        assert_eq!(cfg.scrape.sources.len(), 3);
    }

    #[test]
    fn toml_sources_replace_defaults() {
        let cfg = Config::from_toml(
            r#"
            [[scrape.sources]]
            key = "toys"
            url = "https://example.com/toys"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scrape.sources, vec![CategorySource::new("toys", "https://example.com/toys")]);
    }

    #[test]
    fn env_overrides_ignore_blank() {
        let mut cfg = Config::default();
        cfg.apply_env(|name| match name {
            "AFFIL_TAG" => Some("  shop-20 ".into()),
            "DISCORD_WEBHOOK" => Some("   ".into()),
            _ => None,
        });
        assert_eq!(cfg.links.affiliate_tag.as_deref(), Some("shop-20"));
        assert!(cfg.notify.webhook_url.is_none());
    }

    #[test]
    fn validate_rejects_bad_knobs() {
        let mut cfg = Config::default();
        cfg.scrape.min_accept = 11;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.scrape.sources.push(CategorySource::new("beauty", "https://x"));
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.scrape.sources.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_explicit_config_is_fatal() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, SetupError::ConfigRead { .. }));
    }
}
