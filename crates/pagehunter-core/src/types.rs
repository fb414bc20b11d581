//! 公共类型（对外暴露）
use serde::{Deserialize, Serialize};

/// 扫描目标的来源类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    Html,
    InlineScript,
    InlineStyle,
    ExternalJs,
    ExternalCss,
}

impl SourceType {
    /// 序列化名称（与 JSON 输出一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Html => "html",
            SourceType::InlineScript => "inline-script",
            SourceType::InlineStyle => "inline-style",
            SourceType::ExternalJs => "external-js",
            SourceType::ExternalCss => "external-css",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 命中两侧的上下文窗口
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub before: String,
    #[serde(rename = "match")]
    pub matched: String,
    pub after: String,
}

/// 单次命中的对外表示
/// `value` 始终是字面匹配到的子串，不做任何改写。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub rule_name: String,
    pub value: String,
    pub context: MatchContext,
    pub source: String,
    pub source_type: SourceType,
    pub line_number: usize,
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub html_scanned: usize,
    pub inline_scripts_scanned: usize,
    pub inline_styles_scanned: usize,
    pub external_scripts_scanned: usize,
    pub external_styles_scanned: usize,
    pub external_scripts_failed: usize,
    pub external_styles_failed: usize,
}

/// 单次扫描的最终输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub findings: Vec<Finding>,
    pub stats: ScanStats,
}
