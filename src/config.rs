//! Configuration file parser for the feed panel (`offers-feed.toml`).
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::{FeedFormat, FeedSource, DEFAULT_MAX_FEED_SIZE};
use crate::locale::{DateLocale, StringOverrides, Strings};
use crate::render::RenderContext;
use crate::util::{is_valid_link, validate_feed_url};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Values parse but cannot work together (bad URL, zero limits, ...).
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Per-deployment settings for the feed panel.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed endpoint, fetched once per run.
    pub feed_url: String,

    /// Wire format served by `feed_url`.
    pub format: FeedFormat,

    /// Maximum number of posts kept after dedupe.
    pub feed_limit: usize,

    /// Posts shown before the "show more" toggle is needed.
    pub preview_limit: usize,

    /// External group page, linked from the empty and error states.
    pub group_url: String,

    /// Link used for posts whose own link is missing or invalid.
    /// Defaults to `group_url`.
    pub fallback_url: Option<String>,

    /// Character budget for descriptions (170 or 320 on the live sites).
    pub description_limit: usize,

    /// Locale tag for publication dates (`lv-LV`, `ru-RU`, `en-US`).
    pub locale: DateLocale,

    /// Selects the built-in string table: primary (Latvian) or secondary (Russian).
    pub primary_language: bool,

    /// Social network name shown on each card.
    pub source_label: String,

    /// Maximum accepted feed body size in bytes.
    pub max_response_bytes: usize,

    /// Overall request timeout in seconds. Unset = no timeout of our own.
    pub request_timeout_secs: Option<u64>,

    /// Overrides for individual UI strings.
    pub strings: StringOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: "https://rss.app/feeds/UxVyPO87nsjfrw37.xml".to_string(),
            format: FeedFormat::Rss,
            feed_limit: 12,
            preview_limit: 4,
            group_url: "https://www.facebook.com/groups/1767613113355526/?ref=share".to_string(),
            fallback_url: None,
            description_limit: 170,
            locale: DateLocale::Latvian,
            primary_language: true,
            source_label: "Facebook".to_string(),
            max_response_bytes: DEFAULT_MAX_FEED_SIZE,
            request_timeout_secs: None,
            strings: StringOverrides::default(),
        }
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 13] = [
        "feed_url",
        "format",
        "feed_limit",
        "preview_limit",
        "group_url",
        "fallback_url",
        "description_limit",
        "locale",
        "primary_language",
        "source_label",
        "max_response_bytes",
        "request_timeout_secs",
        "strings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    /// - Values that fail [`Config::validate`] → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading to prevent memory exhaustion
        // from a maliciously large or corrupted config file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Empty text yields defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        tracing::info!(
            feed = %config.feed_url,
            format = %config.format,
            locale = config.locale.tag(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_feed_url(&self.feed_url)
            .map_err(|e| ConfigError::Invalid(format!("feed_url: {e}")))?;

        if self.feed_limit == 0 {
            return Err(ConfigError::Invalid("feed_limit must be at least 1".into()));
        }
        if self.preview_limit == 0 {
            return Err(ConfigError::Invalid("preview_limit must be at least 1".into()));
        }
        if self.description_limit == 0 {
            return Err(ConfigError::Invalid("description_limit must be at least 1".into()));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid("max_response_bytes must be at least 1".into()));
        }

        // Without a usable fallback, posts with bad links are dropped instead of redirected
        if !is_valid_link(self.fallback_link()) {
            tracing::warn!(
                fallback = %self.fallback_link(),
                "Fallback URL is not an absolute http(s) link; posts without a valid link will be dropped"
            );
        }

        Ok(())
    }

    /// Link substituted for posts whose own link is missing or invalid.
    pub fn fallback_link(&self) -> &str {
        self.fallback_url.as_deref().unwrap_or(&self.group_url)
    }

    pub fn feed_source(&self) -> FeedSource {
        FeedSource {
            url: self.feed_url.clone(),
            max_bytes: self.max_response_bytes,
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// The string table for the configured language, with overrides applied.
    pub fn strings(&self) -> Strings {
        Strings::for_language(self.primary_language).with_overrides(&self.strings)
    }

    pub fn render_context<'a>(&'a self, strings: &'a Strings) -> RenderContext<'a> {
        RenderContext {
            strings,
            locale: self.locale,
            source_label: &self.source_label,
            group_url: Some(self.group_url.as_str()).filter(|u| !u.trim().is_empty()),
            description_limit: self.description_limit,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, FeedFormat::Rss);
        assert_eq!(config.feed_limit, 12);
        assert_eq!(config.preview_limit, 4);
        assert_eq!(config.description_limit, 170);
        assert_eq!(config.locale, DateLocale::Latvian);
        assert!(config.primary_language);
        assert_eq!(config.fallback_link(), config.group_url);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/offers_feed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.feed_limit, 12);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("offers_feed_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n  ").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.preview_limit, 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
feed_url = "https://example.com/feed.json"
format = "json"
feed_limit = 25
preview_limit = 6
group_url = "https://www.facebook.com/groups/42"
fallback_url = "https://example.com/posts"
description_limit = 320
locale = "ru-RU"
primary_language = false
source_label = "Instagram"
max_response_bytes = 1024
request_timeout_secs = 15

[strings]
show_more = "Ещё"
"#;
        let config = Config::from_toml(content).unwrap();
        assert_eq!(config.format, FeedFormat::Json);
        assert_eq!(config.feed_limit, 25);
        assert_eq!(config.preview_limit, 6);
        assert_eq!(config.description_limit, 320);
        assert_eq!(config.locale, DateLocale::Russian);
        assert_eq!(config.fallback_link(), "https://example.com/posts");

        let source = config.feed_source();
        assert_eq!(source.max_bytes, 1024);
        assert_eq!(source.timeout, Some(Duration::from_secs(15)));

        let strings = config.strings();
        assert_eq!(strings.show_more, "Ещё");
        assert_eq!(strings.show_less, "Свернуть");
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::from_toml("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = Config::from_toml("format = \"yaml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let err = Config::from_toml("locale = \"de-DE\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::from_toml("feed_limit = 5\ntotally_fake_key = 1\n").unwrap();
        assert_eq!(config.feed_limit, 5);
    }

    #[test]
    fn test_bad_feed_url_rejected() {
        let err = Config::from_toml("feed_url = \"file:///etc/passwd\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(matches!(
            Config::from_toml("feed_limit = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("preview_limit = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_empty_group_url_has_no_state_link() {
        let config = Config::from_toml("group_url = \"\"\n").unwrap();
        let strings = config.strings();
        assert_eq!(config.render_context(&strings).group_url, None);
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("offers_feed_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
