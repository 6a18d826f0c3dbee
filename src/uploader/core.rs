use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::error::{StoreError, UploadError};
use super::progress::ProgressReporter;
use super::store::TaskStore;
use super::task::{UploadStatus, UploadTask};
use super::transport::{UploadContext, UploadTransport};
use super::validator;
use crate::common::models::{DocumentMetadata, UploadFile};
use crate::services::analysis::AnalysisTrigger;
use crate::services::notify::{Notification, NotificationSink};
use crate::services::registry::DocumentRegistry;

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub uploader_id: String,
    pub project_id: Option<String>,
    pub auto_analyze: bool,
}

impl UploadOptions {
    pub fn new(uploader_id: impl Into<String>) -> Self {
        Self {
            uploader_id: uploader_id.into(),
            project_id: None,
            auto_analyze: true,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_auto_analyze(mut self, auto_analyze: bool) -> Self {
        self.auto_analyze = auto_analyze;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub task_ids: Vec<String>,
    pub completed: usize,
    pub failed: usize,
    pub rejected: Vec<String>,
}

// 单个任务的结局：成功时记录分析是否完成
enum TaskOutcome {
    Completed { analyzed: bool },
    Failed,
}

/// 上传队列：依次完成上传、登记和可选的分析
///
/// 同一批文件严格串行，前一个任务进入 `completed` 或 `error` 后才创建下一个任务。
pub struct UploadQueue {
    transport: Arc<dyn UploadTransport>,
    registry: Arc<dyn DocumentRegistry>,
    analyzer: Arc<dyn AnalysisTrigger>,
    notifier: Arc<dyn NotificationSink>,
    store: Arc<TaskStore>,
}

impl UploadQueue {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        registry: Arc<dyn DocumentRegistry>,
        analyzer: Arc<dyn AnalysisTrigger>,
        notifier: Arc<dyn NotificationSink>,
        store: Arc<TaskStore>,
    ) -> Self {
        Self {
            transport,
            registry,
            analyzer,
            notifier,
            store,
        }
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    pub async fn submit(&self, files: Vec<UploadFile>, options: &UploadOptions) -> BatchReport {
        let (accepted, rejected) = validator::partition(files);
        let mut report = BatchReport {
            rejected,
            ..Default::default()
        };

        // 整批只提示一次
        if !report.rejected.is_empty() {
            warn!("⚠️ 跳过不支持的文件: {}", report.rejected.join(", "));
            self.notifier.notify(Notification::warning(
                "Desteklenmeyen dosya",
                format!(
                    "Şu dosyalar desteklenmiyor: {}. Yalnızca PDF, Word, Excel, PowerPoint ve metin dosyaları yüklenebilir.",
                    report.rejected.join(", ")
                ),
            ));
        }

        info!("开始上传批次: {} 个文件", accepted.len());
        for file in accepted {
            let task_id = self.store.insert(file.clone());
            report.task_ids.push(task_id.clone());

            match self.run_task(&task_id, &file, options).await {
                TaskOutcome::Completed { .. } => report.completed += 1,
                TaskOutcome::Failed => report.failed += 1,
            }
        }

        info!(
            "批次结束: 成功 {}, 失败 {}, 跳过 {}",
            report.completed,
            report.failed,
            report.rejected.len()
        );
        report
    }

    async fn run_task(&self, task_id: &str, file: &UploadFile, options: &UploadOptions) -> TaskOutcome {
        let outcome = match self.drive(task_id, file, options).await {
            Ok(analyzed) => self
                .store
                .transition(task_id, UploadStatus::Completed)
                .map(|_| analyzed)
                .map_err(UploadError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(analyzed) => {
                info!("✅ 上传任务完成: {} ({})", file.name, task_id);
                let message = if analyzed {
                    format!("{} başarıyla yüklendi ve analiz edildi.", file.name)
                } else {
                    format!("{} başarıyla yüklendi.", file.name)
                };
                self.notifier
                    .notify(Notification::success("Yükleme tamamlandı", message));
                TaskOutcome::Completed { analyzed }
            }
            Err(e) => {
                error!("❌ 上传任务失败: {} ({}), 错误: {}", file.name, task_id, e);
                if let Err(store_err) = self.store.fail(task_id, e.to_string()) {
                    error!("无法记录任务失败状态: {}", store_err);
                }
                self.notifier.notify(Notification::error(
                    "Yükleme hatası",
                    format!("{} yüklenirken hata oluştu: {}", file.name, e),
                ));
                TaskOutcome::Failed
            }
        }
    }

    // 返回分析是否成功完成
    async fn drive(&self, task_id: &str, file: &UploadFile, options: &UploadOptions) -> Result<bool, UploadError> {
        let context = UploadContext {
            uploader_id: options.uploader_id.clone(),
            project_id: options.project_id.clone(),
        };

        let uploaded = self
            .transport
            .transport(file, &context, self.progress_reporter(task_id))
            .await?;
        self.store.transition(task_id, UploadStatus::Processing)?;

        let document_id = self
            .registry
            .register(DocumentMetadata {
                name: uploaded.name.clone(),
                file_type: uploaded.file_type.clone(),
                size: uploaded.size,
                storage_url: uploaded.url.clone(),
                uploader_id: options.uploader_id.clone(),
                project_id: options.project_id.clone(),
                tags: Vec::new(),
            })
            .await?;
        self.store.set_document_id(task_id, document_id.clone())?;

        if !options.auto_analyze {
            return Ok(false);
        }

        self.store.transition(task_id, UploadStatus::Analyzing)?;
        // 分析失败不影响上传结果，只记录日志
        match self.analyzer.analyze(&document_id).await {
            Ok(result) => {
                debug!("文档分析完成: {} - {}", document_id, result.summary);
                Ok(true)
            }
            Err(e) => {
                warn!("文档分析失败，已忽略: {} ({}): {}", file.name, document_id, e);
                Ok(false)
            }
        }
    }

    fn progress_reporter(&self, task_id: &str) -> ProgressReporter {
        let store = Arc::clone(&self.store);
        let task_id = task_id.to_string();
        ProgressReporter::new(move |percent| {
            if let Err(e) = store.set_progress(&task_id, percent) {
                debug!("忽略进度更新: {}", e);
            }
        })
    }

    // 有任务在进行中时拒绝关闭，并提示用户
    pub fn request_close(&self) -> bool {
        if self.store.has_active() {
            warn!("仍有上传任务进行中，拒绝关闭");
            self.notifier.notify(Notification::warning(
                "Yükleme devam ediyor",
                "Dosyalar yüklenirken pencere kapatılamaz. Lütfen işlemlerin tamamlanmasını bekleyin.",
            ));
            return false;
        }

        let removed = self.store.clear_finished();
        debug!("关闭上传面板，清除 {} 个已结束任务", removed);
        true
    }

    pub fn dismiss(&self, task_id: &str) -> Result<UploadTask, StoreError> {
        self.store.remove(task_id)
    }
}
