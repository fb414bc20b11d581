//! 页面密钥扫描核心库
//!
//! 设计要点：
//! - 单向流水线：资源枚举 → 受限并发抓取 → 工作线程匹配 →
//!   去重 → 指纹过滤 → ScanResult。
//! - 匹配全部在隔离的工作线程执行；调用方的异步上下文不会被
//!   多兆字节页面上的正则匹配卡住。
//! - 规则与设置由外部存储按次提供，扫描期间不可变；误报集与
//!   已见索引由外部持久化，核心只读取并提议更新。
//! - 单元级失败（抓取失败、非法规则、池不可用）就地吸收降级，
//!   永不中止整次扫描。

mod collector;
mod dispatcher;
mod error;
mod fetcher;
mod findings;
mod fingerprint;
mod matcher;
mod options;
mod rules;
mod scan;
mod types;

pub use collector::{collect, CollectedResources, InlineResource};
pub use dispatcher::ScanEngine;
pub use error::ScanError;
pub use fetcher::{build_client, fetch_all, fetch_page, FetchOutcome};
pub use findings::dedupe;
pub use fingerprint::{fingerprint, FalsePositiveRecord, FalsePositiveSet, SeenIndex};
pub use matcher::scan;
pub use options::ScanSettings;
pub use rules::{default_rules, load_rules, Rule};
pub use scan::scan_page;
pub use types::{Finding, MatchContext, ScanResult, ScanStats, SourceType};
