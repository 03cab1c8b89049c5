use serde::{Deserialize, Serialize};

// ── Gazetteer input ──────────────────────────────────────────────────────

/// One node of the nested province → city → district hierarchy, as shipped
/// in `pca-code.json` style dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionNode {
    pub code: String,
    pub name: String,
    #[serde(default, alias = "children", skip_serializing_if = "Vec::is_empty")]
    pub childs: Vec<RegionNode>,
}

impl RegionNode {
    pub fn leaf(code: &str, name: &str) -> Self {
        RegionNode {
            code: code.to_string(),
            name: name.to_string(),
            childs: Vec::new(),
        }
    }

    pub fn with_children(code: &str, name: &str, childs: Vec<RegionNode>) -> Self {
        RegionNode {
            code: code.to_string(),
            name: name.to_string(),
            childs,
        }
    }
}

// ── Tagging output ───────────────────────────────────────────────────────

/// A single tagged span. Offsets are character offsets, inclusive on both
/// ends, relative to the sentence the match was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub sentence: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub code: String,
}

/// All matches of one input record, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedRecord {
    pub id: String,
    pub newspaper: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub matches: Vec<MatchRecord>,
}

impl TaggedRecord {
    /// Render in the whitespace-separated line format:
    /// `id 北京市,code:11 朝阳区,code:110105 `
    pub fn to_line(&self) -> String {
        let mut line = format!("{} ", self.id);
        for m in &self.matches {
            line.push_str(&m.text);
            line.push_str(",code:");
            line.push_str(&m.code);
            line.push(' ');
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_node_accepts_children_alias() {
        let json = r#"{"code":"11","name":"北京市","children":[{"code":"1101","name":"市辖区"}]}"#;
        let node: RegionNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.childs.len(), 1);
        assert_eq!(node.childs[0].name, "市辖区");
        assert!(node.childs[0].childs.is_empty());
    }

    #[test]
    fn test_to_line() {
        let record = TaggedRecord {
            id: "42".into(),
            newspaper: "北京日报".into(),
            origin: Some("11".into()),
            matches: vec![
                MatchRecord {
                    sentence: 0,
                    start: 0,
                    end: 2,
                    text: "北京市".into(),
                    code: "11".into(),
                },
                MatchRecord {
                    sentence: 1,
                    start: 3,
                    end: 5,
                    text: "朝阳区".into(),
                    code: "110105".into(),
                },
            ],
        };
        assert_eq!(record.to_line(), "42 北京市,code:11 朝阳区,code:110105 ");
    }

    #[test]
    fn test_to_line_without_matches() {
        let record = TaggedRecord {
            id: "7".into(),
            newspaper: String::new(),
            origin: None,
            matches: Vec::new(),
        };
        assert_eq!(record.to_line(), "7 ");
    }
}
