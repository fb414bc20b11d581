//! 规则模型与规则文件加载（TOML）
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ScanError;

/// 单条用户规则
/// `patterns` 中的每一条都是独立的备选模式，任意一条都可能编译失败；
/// 编译失败只影响该模式本身（见 matcher）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn enabled_default() -> bool {
    true
}

/// 规则文件中的单个条目（支持 patterns 列表或单数 pattern 字段）
#[derive(Debug, Clone, Deserialize)]
struct RuleEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
}

/// 顶层规则文件结构
#[derive(Debug, Clone, Deserialize)]
struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// 从 TOML 规则文件加载并归一化为 Rule 列表
pub fn load_rules(path: &Path) -> Result<Vec<Rule>, ScanError> {
    let txt = std::fs::read_to_string(path).map_err(|source| ScanError::RuleFile {
        path: path.to_path_buf(),
        source,
    })?;
    rules_from_toml(&txt).map_err(|source| ScanError::RuleParse {
        path: path.to_path_buf(),
        source,
    })
}

/// 解析规则 TOML 文本
/// 兼容两种写法：`patterns = [...]` 或单数 `pattern = "..."`；
/// 两者皆缺的条目直接跳过，不视为错误。
fn rules_from_toml(txt: &str) -> Result<Vec<Rule>, toml::de::Error> {
    let parsed: RuleFile = toml::from_str(txt)?;
    let mut out = Vec::new();

    for e in parsed.rules {
        let patterns = match (e.patterns, e.pattern) {
            (Some(ps), _) if !ps.is_empty() => ps,
            (_, Some(p)) => vec![p],
            _ => continue,
        };
        let name = e.name.unwrap_or_else(|| e.id.clone());
        out.push(Rule {
            id: e.id,
            name,
            enabled: e.enabled.unwrap_or(true),
            patterns,
        });
    }

    Ok(out)
}

/// 内置默认规则（高置信前缀类密钥）
pub fn default_rules() -> Vec<Rule> {
    let table: &[(&str, &str, &[&str])] = &[
        (
            "aws-access-key-id",
            "AWS Access Key ID",
            &[r"(?:A3T[A-Z0-9]|AKIA|ASIA)[A-Z0-9]{16}"],
        ),
        (
            "github-token",
            "GitHub Token",
            &[r"gh[oprsu]_[A-Za-z0-9_]{36,}", r"github_pat_[A-Za-z0-9_]{22,}"],
        ),
        ("slack-token", "Slack Token", &[r"xox[baprs]-[A-Za-z0-9-]{10,}"]),
        (
            "stripe-secret-key",
            "Stripe Secret Key",
            &[r"[sr]k_(?:live|test)_[A-Za-z0-9]{20,}"],
        ),
        ("google-api-key", "Google API Key", &[r"AIza[0-9A-Za-z_\-]{35}"]),
        ("openai-api-key", "OpenAI API Key", &[r"sk-[A-Za-z0-9]{20,}"]),
    ];

    table
        .iter()
        .map(|(id, name, pats)| Rule {
            id: (*id).to_string(),
            name: (*name).to_string(),
            enabled: true,
            patterns: pats.iter().map(|p| (*p).to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_patterns_list_and_singular_pattern() {
        let txt = r#"
            [[rules]]
            id = "aws"
            name = "AWS Key"
            patterns = ["AKIA[0-9A-Z]{16}", "ASIA[0-9A-Z]{16}"]

            [[rules]]
            id = "slack"
            pattern = "xox[baprs]-[A-Za-z0-9-]{10,}"
        "#;
        let rules = rules_from_toml(txt).expect("parse rules");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].patterns.len(), 2);
        assert!(rules[0].enabled);
        // 缺省 name 回退到 id
        assert_eq!(rules[1].name, "slack");
        assert_eq!(rules[1].patterns, vec!["xox[baprs]-[A-Za-z0-9-]{10,}"]);
    }

    #[test]
    fn skips_entries_without_any_pattern() {
        let txt = r#"
            [[rules]]
            id = "empty"
            name = "No Pattern"

            [[rules]]
            id = "ok"
            pattern = "AKIA[0-9A-Z]{16}"
        "#;
        let rules = rules_from_toml(txt).expect("parse rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, "ok");
    }

    #[test]
    fn disabled_flag_round_trips() {
        let txt = r#"
            [[rules]]
            id = "off"
            name = "Disabled"
            enabled = false
            pattern = "x{3}"
        "#;
        let rules = rules_from_toml(txt).expect("parse rules");
        assert!(!rules[0].enabled);
    }

    #[test]
    fn default_rules_are_enabled_and_nonempty() {
        let rules = default_rules();
        assert!(!rules.is_empty());
        assert!(rules.iter().all(|r| r.enabled && !r.patterns.is_empty()));
    }
}
