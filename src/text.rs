use std::sync::LazyLock;

use regex::Regex;
use zhconv::{Variant, zhconv};

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Drop every `<...>` tag and every ASCII space from an article body.
pub fn strip_markup(text: &str) -> String {
    RE_TAG.replace_all(text, "").replace(' ', "")
}

/// Convert traditional characters to simplified ones (`長春市` → `长春市`).
pub fn to_simplified(text: &str) -> String {
    zhconv(text, Variant::ZhHans)
}

/// Split after each delimiter, keeping it with the sentence it ends.
/// Empty pieces are dropped.
pub fn split_sentences<'a>(text: &'a str, delimiters: &[char]) -> Vec<&'a str> {
    text.split_inclusive(|c: char| delimiters.contains(&c))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DELIMITERS;

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("<p>北京市 朝阳区</p><br/>今日 晴"),
            "北京市朝阳区今日晴"
        );
        // Full-width spaces are content, not padding.
        assert_eq!(strip_markup("甲\u{3000}乙"), "甲\u{3000}乙");
    }

    #[test]
    fn test_to_simplified() {
        assert_eq!(to_simplified("長春市今天下雪。"), "长春市今天下雪。");
        assert_eq!(to_simplified("北京市朝阳区"), "北京市朝阳区");
    }

    #[test]
    fn test_split_keeps_delimiters() {
        let parts = split_sentences("北京市晴。上海,多云;广州", DEFAULT_DELIMITERS);
        assert_eq!(parts, vec!["北京市晴。", "上海,", "多云;", "广州"]);
    }

    #[test]
    fn test_split_edge_cases() {
        assert!(split_sentences("", DEFAULT_DELIMITERS).is_empty());
        assert_eq!(split_sentences("。。", DEFAULT_DELIMITERS), vec!["。", "。"]);
        assert_eq!(split_sentences("无标点", &[]), vec!["无标点"]);
    }
}
