use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use tracing::info;

use crate::common::models::{DocumentId, DocumentMetadata};
use crate::uploader::clock::Clock;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("文档元数据无效: {0}")]
    InvalidMetadata(String),
}

// 文档库：上传流水线唯一的写入口
#[async_trait]
pub trait DocumentRegistry: Send + Sync {
    async fn register(&self, metadata: DocumentMetadata) -> Result<DocumentId, RegistryError>;
}

#[derive(Debug, Clone)]
pub struct RegisteredDocument {
    pub id: DocumentId,
    pub metadata: DocumentMetadata,
    pub registered_at: DateTime<Utc>,
}

pub struct InMemoryRegistry {
    documents: DashMap<DocumentId, RegisteredDocument>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: DashMap::new(),
            clock,
        }
    }

    pub fn get(&self, id: &DocumentId) -> Option<RegisteredDocument> {
        self.documents.get(id).map(|doc| doc.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    // 按注册时间排序
    pub fn list(&self) -> Vec<RegisteredDocument> {
        let mut docs: Vec<RegisteredDocument> =
            self.documents.iter().map(|r| r.value().clone()).collect();
        docs.sort_by_key(|d| d.registered_at);
        docs
    }
}

#[async_trait]
impl DocumentRegistry for InMemoryRegistry {
    async fn register(&self, metadata: DocumentMetadata) -> Result<DocumentId, RegistryError> {
        if metadata.name.trim().is_empty() {
            return Err(RegistryError::InvalidMetadata("文件名为空".to_string()));
        }
        if metadata.storage_url.is_empty() {
            return Err(RegistryError::InvalidMetadata("存储地址为空".to_string()));
        }

        let id = DocumentId::generate();
        info!("📄 文档已注册: {} -> {}", metadata.name, id);
        self.documents.insert(
            id.clone(),
            RegisteredDocument {
                id: id.clone(),
                metadata,
                registered_at: self.clock.now(),
            },
        );
        Ok(id)
    }
}
