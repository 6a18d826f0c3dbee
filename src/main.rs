use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use metrika_uploader::common::config::UploaderConfig;
use metrika_uploader::common::logger::PrettyLogger;
use metrika_uploader::common::models::UploadFile;
use metrika_uploader::common::session::SessionStore;
use metrika_uploader::services::{ConsoleNotifier, InMemoryRegistry, SimulatedAnalyzer};
use metrika_uploader::uploader::clock::{Clock, TokioClock};
use metrika_uploader::uploader::progress::BatchProgress;
use metrika_uploader::uploader::{TaskStore, UploadOptions, UploadQueue, transport};
use metrika_uploader::{log_error, log_warning};

mod cli;

/// 构建配置：环境变量优先级低于命令行参数
fn build_config(args: &cli::Cli) -> anyhow::Result<UploaderConfig> {
    let mut config = UploaderConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = &args.session_file {
        config.session_file = path.clone();
    }
    config.rng_seed = args.seed;
    Ok(config)
}

/// 上传者ID：命令行 > 会话文件 > anonymous
async fn resolve_uploader(args: &cli::Cli, session: &SessionStore) -> String {
    if let Some(id) = &args.uploader_id {
        return id.clone();
    }
    match session.load().await {
        Ok(state) => state.user_id.unwrap_or_else(|| "anonymous".to_string()),
        Err(e) => {
            warn!("读取会话失败: {}", e);
            "anonymous".to_string()
        }
    }
}

// 文件内容在上传阶段读取，读取失败会成为任务错误
async fn load_files(args: &cli::Cli) -> Vec<UploadFile> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if !path.is_file() {
            log_warning!("文件不存在或不可读: {}", path.display());
        }
        PrettyLogger::file_info("待上传", path.display().to_string());
        files.push(UploadFile::from_path(path).await);
    }
    files
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let args = cli::Cli::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = build_config(&args)?;
    debug!("配置: {:?}", config);

    let session = SessionStore::new(&config.session_file);
    let uploader_id = resolve_uploader(&args, &session).await;

    let files = load_files(&args).await;
    if files.is_empty() {
        bail!("没有可上传的文件");
    }

    // 组装流水线
    let batch_progress = BatchProgress::new();
    let clock: Arc<dyn Clock> = Arc::new(TokioClock);
    let transport = transport::from_config(&config, Arc::clone(&clock)).context("初始化上传通道失败")?;
    let registry = Arc::new(InMemoryRegistry::new(Arc::clone(&clock)));
    let analyzer = Arc::new(SimulatedAnalyzer::new(Arc::clone(&registry), Arc::clone(&clock)));
    let store = Arc::new(TaskStore::new(Arc::clone(&clock)));
    let queue = UploadQueue::new(
        transport,
        registry.clone(),
        analyzer,
        Arc::new(ConsoleNotifier::with_progress(batch_progress.multi())),
        Arc::clone(&store),
    );

    let mut options = UploadOptions::new(uploader_id).with_auto_analyze(!args.no_analyze);
    if let Some(project_id) = &args.project_id {
        options = options.with_project(project_id.clone());
    }

    PrettyLogger::title("Metrika");
    info!("开始上传 {} 个文件", files.len());

    let (stop_tx, stop_rx) = oneshot::channel();
    let progress = tokio::spawn(batch_progress.follow(store.subscribe(), stop_rx));

    let report = queue.submit(files, &options).await;

    let _ = stop_tx.send(());
    if let Err(e) = progress.await {
        log_error!("进度显示异常退出: {}", e);
    }

    PrettyLogger::separator();
    let mut summary = vec![
        format!("成功: {}", report.completed.to_string().green()),
        format!("失败: {}", report.failed.to_string().red()),
    ];
    if !report.rejected.is_empty() {
        summary.push(format!("跳过: {}", report.rejected.join(", ").yellow()));
    }
    for doc in registry.list() {
        summary.push(format!("{} -> {}", doc.metadata.name, doc.id));
    }
    PrettyLogger::completion_summary(summary);

    if !queue.request_close() {
        log_warning!("仍有任务未结束");
    }

    if report.failed > 0 {
        bail!("{} 个文件上传失败", report.failed);
    }
    Ok(())
}
