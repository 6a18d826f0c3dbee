use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::models::{DocumentId, UploadFile};

#[derive(Debug, Clone)]
pub struct UploadTask {
    pub id: String,
    pub file: UploadFile,
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,       // 仅在 Error 状态下存在
    pub document_id: Option<DocumentId>, // 注册成功后写入，之后不再变化
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadTask {
    pub fn new(file: UploadFile, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file,
            progress: 0,
            status: UploadStatus::Uploading,
            error: None,
            document_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// --------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Processing,
    Analyzing,
    Completed,
    Error,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "uploading",
            UploadStatus::Processing => "processing",
            UploadStatus::Analyzing => "analyzing",
            UploadStatus::Completed => "completed",
            UploadStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error)
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    // 只允许向前推进；Error 可从任一进行中状态进入
    pub fn can_advance_to(&self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Uploading, Processing)
                | (Processing, Analyzing)
                | (Processing, Completed)
                | (Analyzing, Completed)
                | (Uploading | Processing | Analyzing, Error)
        )
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
