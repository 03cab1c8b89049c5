use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// Origin codes of publishers printing in traditional script
/// (Hong Kong, Macau).
pub const TRADITIONAL_SCRIPT_ORIGINS: &[&str] = &["81", "82"];

/// Newspaper name → origin region code.
#[derive(Debug, Clone, Default)]
pub struct NewspaperList {
    origins: HashMap<String, String>,
}

impl NewspaperList {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::open(path, e))?;
        let list = Self::parse(&text)?;
        info!(path = %path.display(), newspapers = list.len(), "newspaper list loaded");
        Ok(list)
    }

    /// Parse whitespace-separated `name code` pairs. Pairs may span lines;
    /// a later entry for the same name replaces an earlier one.
    pub fn parse(text: &str) -> Result<Self> {
        let mut origins = HashMap::new();
        let mut pending: Option<(&str, usize)> = None;

        for (idx, line) in text.lines().enumerate() {
            for token in line.split_whitespace() {
                match pending.take() {
                    None => pending = Some((token, idx + 1)),
                    Some((name, _)) => {
                        origins.insert(name.to_string(), token.to_string());
                    }
                }
            }
        }

        if let Some((name, line)) = pending {
            return Err(Error::NewspaperList {
                line,
                reason: format!("newspaper {name:?} has no origin code"),
            });
        }
        Ok(NewspaperList { origins })
    }

    pub fn origin_for(&self, newspaper: &str) -> Option<&str> {
        self.origins.get(newspaper).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

pub fn is_traditional_script(origin: &str) -> bool {
    TRADITIONAL_SCRIPT_ORIGINS.contains(&origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let list = NewspaperList::parse("北京日报 11\n吉林日报\t22\n\n明报 81\n").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.origin_for("北京日报"), Some("11"));
        assert_eq!(list.origin_for("吉林日报"), Some("22"));
        assert_eq!(list.origin_for("人民日报"), None);
    }

    #[test]
    fn test_pair_split_across_lines() {
        let list = NewspaperList::parse("北京日报\n11 吉林日报 22").unwrap();
        assert_eq!(list.origin_for("北京日报"), Some("11"));
        assert_eq!(list.origin_for("吉林日报"), Some("22"));
    }

    #[test]
    fn test_dangling_name_is_error() {
        let err = NewspaperList::parse("北京日报 11\n吉林日报\n").unwrap_err();
        match err {
            Error::NewspaperList { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_traditional_script_origins() {
        assert!(is_traditional_script("81"));
        assert!(is_traditional_script("82"));
        assert!(!is_traditional_script("11"));
    }
}
