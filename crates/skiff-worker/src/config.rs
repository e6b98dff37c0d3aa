//! Worker configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};
use skiff_cache::{CacheVersion, VersionError};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The version token failed validation.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// The offline resource list is empty.
    #[error("offline_resources must list at least one URL")]
    NoOfflineResources,

    /// A fallback URL is not part of the offline resource list.
    #[error("{0} {1:?} is not listed in offline_resources")]
    FallbackNotInstalled(&'static str, String),

    /// A URL pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(String),
}

/// Worker configuration.
///
/// `always_fetch`, `never_cache`, and `image_pattern` hold regular
/// expressions matched against the full request URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Cache version token; bump it to retire the previous caches.
    pub version: String,
    /// URLs fetched into the offline partition at install.
    pub offline_resources: Vec<String>,
    /// Patterns always served live from the network.
    #[serde(default)]
    pub always_fetch: Vec<String>,
    /// Patterns served live and never written to the cache.
    #[serde(default)]
    pub never_cache: Vec<String>,
    /// Document served when a page cannot be reached or recovered.
    #[serde(default = "default_offline_document")]
    pub offline_document: String,
    /// Image served when an image cannot be reached or recovered.
    pub placeholder_image: String,
    /// Pattern recognizing image requests by URL extension.
    #[serde(default = "default_image_pattern")]
    pub image_pattern: String,
}

fn default_offline_document() -> String {
    "/offline.html".to_string()
}

fn default_image_pattern() -> String {
    r"(?i)\.(jpg|png|gif|svg|jpeg)(\?.*)?$".to_string()
}

impl WorkerConfig {
    /// Create a configuration for a version token.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            offline_resources: Vec::new(),
            always_fetch: Vec::new(),
            never_cache: Vec::new(),
            offline_document: default_offline_document(),
            placeholder_image: String::new(),
            image_pattern: default_image_pattern(),
        }
    }

    /// Set the URLs pre-fetched at install.
    pub fn with_offline_resources(mut self, urls: Vec<&str>) -> Self {
        self.offline_resources = urls.into_iter().map(String::from).collect();
        self
    }

    /// Add a pattern that is always served live.
    pub fn with_always_fetch(mut self, pattern: impl Into<String>) -> Self {
        self.always_fetch.push(pattern.into());
        self
    }

    /// Add a pattern that is never written to the cache.
    pub fn with_never_cache(mut self, pattern: impl Into<String>) -> Self {
        self.never_cache.push(pattern.into());
        self
    }

    /// Set the offline fallback document.
    pub fn with_offline_document(mut self, url: impl Into<String>) -> Self {
        self.offline_document = url.into();
        self
    }

    /// Set the placeholder image served for unreachable images.
    pub fn with_placeholder_image(mut self, url: impl Into<String>) -> Self {
        self.placeholder_image = url.into();
        self
    }

    /// The parsed cache version token.
    pub fn cache_version(&self) -> Result<CacheVersion, ConfigError> {
        Ok(CacheVersion::new(self.version.as_str())?)
    }

    /// Validate internal consistency.
    ///
    /// The version token must parse, the offline list must be non-empty,
    /// both fallback URLs must be installed offline, and every pattern
    /// must compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache_version()?;

        if self.offline_resources.is_empty() {
            return Err(ConfigError::NoOfflineResources);
        }
        for (field, url) in [
            ("offline_document", &self.offline_document),
            ("placeholder_image", &self.placeholder_image),
        ] {
            if !self.offline_resources.contains(url) {
                return Err(ConfigError::FallbackNotInstalled(field, url.clone()));
            }
        }

        for pattern in self.always_fetch.iter().chain(&self.never_cache) {
            compile(pattern)?;
        }
        compile(&self.image_pattern)?;
        Ok(())
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Pattern(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> WorkerConfig {
        WorkerConfig::new("site_v1")
            .with_offline_resources(vec!["/", "/offline.html", "/img/placeholder.png"])
            .with_placeholder_image("/img/placeholder.png")
            .with_always_fetch(r"^https?://api\.example\.com/")
    }

    #[test]
    fn test_valid_config_passes() {
        valid_config().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_version_token() {
        let config = WorkerConfig::new("v1:oops");
        assert!(matches!(config.validate(), Err(ConfigError::Version(_))));
    }

    #[test]
    fn test_rejects_empty_offline_list() {
        let config = WorkerConfig::new("v1").with_placeholder_image("/p.png");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoOfflineResources)
        ));
    }

    #[test]
    fn test_rejects_uninstalled_fallbacks() {
        let mut config = valid_config();
        config.placeholder_image = "/not-installed.png".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FallbackNotInstalled("placeholder_image", _))
        ));

        let mut config = valid_config();
        config.offline_document = "/elsewhere.html".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FallbackNotInstalled("offline_document", _))
        ));
    }

    #[test]
    fn test_rejects_broken_pattern() {
        let config = valid_config().with_never_cache("([unclosed");
        assert!(matches!(config.validate(), Err(ConfigError::Pattern(_))));
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: WorkerConfig = serde_json::from_str(
            r#"{
                "version": "site_v2",
                "offline_resources": ["/", "/offline.html", "/img/placeholder.png"],
                "placeholder_image": "/img/placeholder.png"
            }"#,
        )
        .unwrap();

        assert_eq!(config.offline_document, "/offline.html");
        assert!(config.always_fetch.is_empty());
        assert!(config.never_cache.is_empty());
        assert_eq!(config.image_pattern, default_image_pattern());
        config.validate().unwrap();
    }
}
