//! 外部资源抓取（受并发上限约束的工作窃取式调度）
//!
//! 设计要点：
//! - 共享 next 游标 + min(limit, len) 个抓取任务：任务完成当前槽位后
//!   立即认领下一个未认领的下标，并发上限内不存在空闲槽位。
//! - 输出与输入一一对应（out[i] 对应 urls[i]），与完成顺序无关。
//! - 单个 URL 的失败（网络错误 / 非 2xx）只影响自己的槽位，不重试、
//!   不中止兄弟任务；体积超限与失败是两种不同的结果。
//! - 客户端不携带 cookie（抓取内容只读，不得泄露会话凭据），允许命中
//!   HTTP 缓存，并设置显式超时，迟滞资源不会拖住整次扫描。
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::error::ScanError;
use crate::options::ScanSettings;

/// 单个 URL 的抓取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 成功取回的资源体
    Body(String),
    /// 网络错误或非 2xx；该槽位按空内容处理并计入失败
    Failed,
    /// 成功但体积超限；跳过匹配（区别于失败，不计入失败数）
    Oversize,
}

/// 构建一次扫描会话共享的 HTTP 客户端
pub fn build_client(settings: &ScanSettings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(settings.fetch_timeout_ms))
        .build()
        .expect("build http client")
}

/// 并发抓取全部 URL
/// `concurrency_limit` 取值 [1, len] 之外时就近收拢；空输入直接返回。
pub async fn fetch_all(
    client: &reqwest::Client,
    urls: &[String],
    concurrency_limit: usize,
    max_body_bytes: usize,
) -> Vec<FetchOutcome> {
    if urls.is_empty() {
        return Vec::new();
    }
    let limit = concurrency_limit.clamp(1, urls.len());

    let urls: Arc<Vec<String>> = Arc::new(urls.to_vec());
    let next = Arc::new(AtomicUsize::new(0));
    let results: Arc<Mutex<Vec<Option<FetchOutcome>>>> =
        Arc::new(Mutex::new(vec![None; urls.len()]));

    let mut tasks = Vec::with_capacity(limit);
    for _ in 0..limit {
        let client = client.clone();
        let urls = Arc::clone(&urls);
        let next = Arc::clone(&next);
        let results = Arc::clone(&results);
        tasks.push(tokio::spawn(async move {
            loop {
                // 认领下一个未抓取的下标（工作窃取）
                let idx = next.fetch_add(1, Ordering::SeqCst);
                if idx >= urls.len() {
                    break;
                }
                let outcome = fetch_one(&client, &urls[idx], max_body_bytes).await;
                results.lock().unwrap()[idx] = Some(outcome);
            }
        }));
    }
    for t in tasks {
        let _ = t.await;
    }

    let mut slots = results.lock().unwrap();
    slots.drain(..).map(|o| o.unwrap_or(FetchOutcome::Failed)).collect()
}

/// 抓取单个 URL；任何失败都吸收为 Failed
async fn fetch_one(client: &reqwest::Client, url: &str, max_body_bytes: usize) -> FetchOutcome {
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(err) => {
            debug!(%url, %err, "resource fetch failed");
            return FetchOutcome::Failed;
        }
    };
    if !resp.status().is_success() {
        debug!(%url, status = resp.status().as_u16(), "resource fetch returned non-2xx");
        return FetchOutcome::Failed;
    }

    // Content-Length 先行判断可避免下载超限体；最终仍以实际长度为准
    if let Some(len) = resp.content_length() {
        if len > max_body_bytes as u64 {
            debug!(%url, len, "resource skipped: body exceeds size limit");
            return FetchOutcome::Oversize;
        }
    }
    match resp.text().await {
        Ok(body) if body.len() > max_body_bytes => {
            debug!(%url, len = body.len(), "resource skipped: body exceeds size limit");
            FetchOutcome::Oversize
        }
        Ok(body) => FetchOutcome::Body(body),
        Err(err) => {
            debug!(%url, %err, "resource body read failed");
            FetchOutcome::Failed
        }
    }
}

/// 抓取页面本体（CLI 入口使用）；页面拿不到则整次扫描无从谈起，故上抛
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, ScanError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScanError::PageStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp.text().await?)
}
