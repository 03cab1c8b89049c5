use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest span ever tried, in characters.
pub const DEFAULT_MAX_WINDOW: usize = 15;
/// Shortest span ever tried. Single characters are never matched.
pub const DEFAULT_MIN_WINDOW: usize = 2;
/// Characters a sentence ends after.
pub const DEFAULT_DELIMITERS: &[char] = &['。', '|', ',', ';'];

/// Tagger settings, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub max_window: usize,
    pub min_window: usize,
    pub sentence_delimiters: Vec<char>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            max_window: DEFAULT_MAX_WINDOW,
            min_window: DEFAULT_MIN_WINDOW,
            sentence_delimiters: DEFAULT_DELIMITERS.to_vec(),
        }
    }
}

impl TaggerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::open(path, e))?;
        let config: TaggerConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_window < DEFAULT_MIN_WINDOW {
            return Err(Error::Config(format!(
                "min_window must be at least {DEFAULT_MIN_WINDOW}, got {}",
                self.min_window
            )));
        }
        if self.max_window < self.min_window {
            return Err(Error::Config(format!(
                "max_window {} is below min_window {}",
                self.max_window, self.min_window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = TaggerConfig::default();
        assert_eq!(c.max_window, 15);
        assert_eq!(c.min_window, 2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: TaggerConfig = serde_json::from_str(r#"{"max_window": 8}"#).unwrap();
        assert_eq!(c.max_window, 8);
        assert_eq!(c.min_window, 2);
        assert_eq!(c.sentence_delimiters, DEFAULT_DELIMITERS.to_vec());
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let c = TaggerConfig {
            min_window: 1,
            ..TaggerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        let c = TaggerConfig {
            max_window: 3,
            min_window: 4,
            ..TaggerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagger.json");
        fs::write(&path, r#"{"max_window": 6, "sentence_delimiters": ["。", "！"]}"#).unwrap();
        let c = TaggerConfig::load(&path).unwrap();
        assert_eq!(c.max_window, 6);
        assert_eq!(c.sentence_delimiters, vec!['。', '！']);

        fs::write(&path, r#"{"max_window": 1}"#).unwrap();
        assert!(TaggerConfig::load(&path).is_err());
    }
}
