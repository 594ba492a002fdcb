use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::search::MatchMode;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// One column the presentation layer renders: which normalized key to read
/// and what to call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
}

/// Everything the lookup pipeline is parameterized on. Loaded from a YAML
/// file when one is given; the defaults describe the published
/// English–Malayalam dictionary sheet this tool grew up against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Publish-to-web CSV endpoint of the source spreadsheet.
    pub source_url: String,
    /// Normalized key that must be non-empty for a row to be kept.
    pub required_key: String,
    /// Normalized keys that participate in query matching.
    pub search_fields: Vec<String>,
    pub match_mode: MatchMode,
    /// Quiet period before a query change triggers a filter pass. Honored by
    /// keystroke-driven frontends via [`crate::search::debounce::Debouncer`];
    /// the bundled CLI reads whole lines from stdin and applies each query
    /// directly, so it ignores this value.
    pub debounce_ms: u64,
    /// Columns the presentation layer shows, in display order.
    pub columns: Vec<ColumnSpec>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source_url: "https://docs.google.com/spreadsheets/d/e/2PACX-1vR1yXM-26NcSPpkrOMGFgvCRwYcFfzcaSSYGiD8mztHs_tJjUXLoFf7F-J2kwEWEw/pub?output=csv".to_string(),
            required_key: "fromContent".to_string(),
            search_fields: vec!["fromContent".to_string(), "toContent".to_string()],
            match_mode: MatchMode::Contains,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            columns: vec![
                ColumnSpec {
                    key: "fromContent".to_string(),
                    label: "English".to_string(),
                },
                ColumnSpec {
                    key: "toContent".to_string(),
                    label: "Malayalam".to_string(),
                },
            ],
        }
    }
}

impl LookupConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.source_url)
            .with_context(|| format!("source_url is not a valid url: {}", self.source_url))?;
        if self.required_key.trim().is_empty() {
            bail!("required_key must not be empty");
        }
        if self.search_fields.is_empty() {
            bail!("search_fields must name at least one column key");
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_mirror_the_dictionary_sheet() {
        let config = LookupConfig::default();
        assert_eq!(config.required_key, "fromContent");
        assert_eq!(config.search_fields.len(), 2);
        assert_eq!(config.match_mode, MatchMode::Contains);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_overrides_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "required_key: word\nsearch_fields: [word]\nmatch_mode: exact\ndebounce_ms: 150"
        )?;

        let config = LookupConfig::from_file(file.path())?;
        assert_eq!(config.required_key, "word");
        assert_eq!(config.search_fields, vec!["word".to_string()]);
        assert_eq!(config.match_mode, MatchMode::Exact);
        assert_eq!(config.debounce(), Duration::from_millis(150));
        // untouched keys keep their defaults
        assert!(config.source_url.starts_with("https://docs.google.com/"));
        Ok(())
    }

    #[test]
    fn validation_rejects_bad_urls_and_empty_keys() {
        let mut config = LookupConfig {
            source_url: "definitely not a url".to_string(),
            ..LookupConfig::default()
        };
        assert!(config.validate().is_err());

        config = LookupConfig {
            required_key: "  ".to_string(),
            ..LookupConfig::default()
        };
        assert!(config.validate().is_err());

        config = LookupConfig {
            search_fields: vec![],
            ..LookupConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
