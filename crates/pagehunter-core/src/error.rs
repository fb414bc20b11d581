//! 顶层扫描错误类型
//!
//! 只有少数错误会上抛到调用方：规则文件无法读取/解析、页面 URL 非法、
//! 页面本体抓取失败。单个资源、单条规则或线程池的失败均在各自模块内
//! 吸收，降级为"该单元无命中"，不会中止整次扫描。
use std::path::PathBuf;
use thiserror::Error;

/// 扫描错误
#[derive(Debug, Error)]
pub enum ScanError {
    /// 规则文件读取失败
    #[error("rule file read failed: {path}")]
    RuleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 规则文件解析失败
    #[error("rule file parse failed: {path}")]
    RuleParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 页面 URL 无法解析（外部资源的相对地址无从绝对化）
    #[error("invalid page url: {url}")]
    PageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP 请求失败（页面本体抓取路径）
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 页面本体返回非 2xx
    #[error("page fetch returned {status}: {url}")]
    PageStatus { url: String, status: u16 },
}
