//! 扫描设置（模块）
use std::path::PathBuf;

/// 扫描设置
///
/// 每个字段都有显式默认值；外部存储只需覆盖它关心的项，
/// 不存在"半合并"的设置对象。规则与设置在一次扫描期间不可变。
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// 仅抓取与页面同域的外部资源
    pub scan_current_domain_only: bool,
    /// 是否抓取第三方（跨域）外部资源
    pub scan_third_party_resources: bool,
    /// 外部资源体积上限（KB）；超过则跳过匹配（区别于抓取失败）
    pub max_file_size_kb: u64,
    /// 外部资源并发抓取上限
    pub fetch_concurrency: usize,
    /// 单个请求的超时（毫秒）；迟滞资源只影响自己的槽位
    pub fetch_timeout_ms: u64,
    /// 扫描开始前的固定等待（毫秒），让动态注入内容稳定；0 表示不等待
    pub settle_delay_ms: u64,
    /// 匹配工作线程数：None 表示自动（等于 CPU 核数）
    pub workers: Option<usize>,
    /// 规则文件路径（TOML）；为空则使用内置默认规则
    pub rules_path: Option<PathBuf>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            scan_current_domain_only: false,
            scan_third_party_resources: true,
            max_file_size_kb: 1024,
            fetch_concurrency: 10,
            fetch_timeout_ms: 15_000,
            settle_delay_ms: 500,
            workers: None,
            rules_path: None,
        }
    }
}

impl ScanSettings {
    /// 体积上限换算为字节
    pub fn max_body_bytes(&self) -> usize {
        (self.max_file_size_kb as usize) * 1024
    }
}
