use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::registry::InMemoryRegistry;
use crate::common::models::DocumentId;
use crate::uploader::clock::Clock;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("文档不存在: {0}")]
    NotFound(DocumentId),

    #[error("分析失败: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub document_id: DocumentId,
    pub summary: String,
    pub key_points: Vec<String>,
    pub sentiment: Sentiment,
    pub analyzed_at: DateTime<Utc>,
}

// 文档分析入口，属于尽力而为的增强步骤
#[async_trait]
pub trait AnalysisTrigger: Send + Sync {
    async fn analyze(&self, document_id: &DocumentId) -> Result<AnalysisResult, AnalysisError>;
}

pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(500);

// 本地模拟分析：根据文档库中的元数据生成摘要
pub struct SimulatedAnalyzer {
    registry: Arc<InMemoryRegistry>,
    clock: Arc<dyn Clock>,
    delay: Duration,
}

impl SimulatedAnalyzer {
    pub fn new(registry: Arc<InMemoryRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            delay: DEFAULT_ANALYSIS_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AnalysisTrigger for SimulatedAnalyzer {
    async fn analyze(&self, document_id: &DocumentId) -> Result<AnalysisResult, AnalysisError> {
        let document = self
            .registry
            .get(document_id)
            .ok_or_else(|| AnalysisError::NotFound(document_id.clone()))?;

        debug!("开始分析文档: {}", document_id);
        self.clock.sleep(self.delay).await;

        let meta = &document.metadata;
        let mut key_points = vec![
            format!("Dosya türü: {}", meta.file_type),
            format!("Boyut: {} KB", meta.size.div_ceil(1024)),
        ];
        if let Some(project_id) = &meta.project_id {
            key_points.push(format!("Proje: {}", project_id));
        }

        Ok(AnalysisResult {
            document_id: document_id.clone(),
            summary: format!("{} belgesinin otomatik özeti hazırlandı.", meta.name),
            key_points,
            // 只看元数据，无法判断倾向
            sentiment: Sentiment::Neutral,
            analyzed_at: self.clock.now(),
        })
    }
}
