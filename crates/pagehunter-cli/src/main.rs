use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pagehunter_core::{
    build_client, default_rules, fetch_page, load_rules, scan_page, FalsePositiveSet, ScanEngine,
    ScanSettings, SeenIndex,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "pagehunter", version, about = "网页密钥猎人")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 抓取页面并扫描其资源，输出命中 JSON
    Scan {
        /// 页面 URL；与 --input 二选一
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        url: Option<String>,

        /// 本地 HTML 文件；需配合 --page-url 提供基准地址
        #[arg(long, requires = "page_url")]
        input: Option<PathBuf>,

        /// --input 模式下页面的基准 URL（决定相对地址与资源键）
        #[arg(long)]
        page_url: Option<String>,

        /// 输出文件（JSON）；缺省写到标准输出
        #[arg(long)]
        output: Option<PathBuf>,

        /// 规则文件路径（TOML），默认使用内置规则
        #[arg(long)]
        rules: Option<PathBuf>,

        /// 匹配线程数（"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        workers: String,

        /// 外部资源并发抓取上限
        #[arg(long, default_value_t = 10)]
        concurrency: usize,

        /// 外部资源体积上限（KB）
        #[arg(long, default_value_t = 1024)]
        max_file_size_kb: u64,

        /// 仅抓取与页面同域的外部资源
        #[arg(long)]
        same_domain_only: bool,

        /// 跳过第三方（跨域）外部资源
        #[arg(long)]
        skip_third_party: bool,

        /// 误报集文件（JSON）；其中指纹对应的命中将被隐去
        #[arg(long)]
        false_positives: Option<PathBuf>,

        /// 已见索引文件（JSON）；扫描后回写
        #[arg(long)]
        seen_index: Option<PathBuf>,

        /// 仅输出此前未见过的命中（配合 --seen-index）
        #[arg(long)]
        only_new: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            url,
            input,
            page_url,
            output,
            rules,
            workers,
            concurrency,
            max_file_size_kb,
            same_domain_only,
            skip_third_party,
            false_positives,
            seen_index,
            only_new,
        } => {
            let settings = ScanSettings {
                scan_current_domain_only: same_domain_only,
                scan_third_party_resources: !skip_third_party,
                max_file_size_kb,
                fetch_concurrency: concurrency,
                workers: parse_workers(&workers),
                rules_path: rules,
                ..ScanSettings::default()
            };

            // 规则：显式文件优先，否则内置默认集
            let rule_set = match &settings.rules_path {
                Some(path) => load_rules(path).context("load rules file")?,
                None => default_rules(),
            };

            // 误报集与已见索引由文件充当外部存储
            let fp_set: FalsePositiveSet =
                load_json_or_default(false_positives.as_deref()).context("load false-positive set")?;
            let mut seen: SeenIndex =
                load_json_or_default(seen_index.as_deref()).context("load seen index")?;

            // 页面来源：URL 直接抓取，或本地文件 + 显式基准地址
            let (html, page) = match (url, input) {
                (Some(u), _) => {
                    info!(url = %u, "fetching page");
                    let client = build_client(&settings);
                    let html = fetch_page(&client, &u).await.context("fetch page")?;
                    (html, u)
                }
                (None, Some(path)) => {
                    let html = std::fs::read_to_string(&path).context("read input file")?;
                    let page = page_url.context("--input requires --page-url")?;
                    (html, page)
                }
                (None, None) => bail!("either --url or --input is required"),
            };

            let engine = ScanEngine::new(settings.workers);
            info!(page = %page, rules = rule_set.len(), "starting scan");
            let mut result = scan_page(&html, &page, &rule_set, &settings, &fp_set, &engine)
                .await
                .context("scan page")?;

            if only_new {
                let found = std::mem::take(&mut result.findings);
                result.findings = seen.get_new_findings(&page, found);
            }
            if let Some(path) = seen_index.as_deref() {
                seen.mark_seen(&page, &result.findings);
                save_json(path, &seen).context("save seen index")?;
            }

            match &output {
                Some(path) => {
                    let mut out = BufWriter::new(File::create(path).context("create output file")?);
                    serde_json::to_writer_pretty(&mut out, &result).context("write result json")?;
                    out.flush().ok();
                }
                None => println!("{}", serde_json::to_string_pretty(&result).context("render result json")?),
            }

            info!(
                findings = result.findings.len(),
                scripts_scanned = result.stats.external_scripts_scanned,
                scripts_failed = result.stats.external_scripts_failed,
                styles_scanned = result.stats.external_styles_scanned,
                "scan finished"
            );
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数（"auto" 表示按 CPU 核数自动）
fn parse_workers(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") {
        return None;
    }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

/// 读取 JSON 文件；未提供路径或文件不存在时返回默认值
fn load_json_or_default<T: Default + DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    if !path.exists() {
        return Ok(T::default());
    }
    let txt = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&txt)?)
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush()?;
    Ok(())
}
