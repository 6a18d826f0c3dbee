use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use mime_guess::mime::Mime;
use serde::{Deserialize, Serialize};
use tracing::debug;

// -----------------------------------------------------------------------------------------------

// 文件内容来源：内存数据，或上传时才读取的磁盘路径
#[derive(Debug, Clone)]
pub enum FileSource {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

// 待上传的文件，创建后不可修改
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String, // 声明的类型，可能为空或不合法
    pub source: FileSource,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type: mime_type.into(),
            source: FileSource::Memory(Arc::from(data)),
        }
    }

    // 只取文件名、大小和猜测的类型，内容在上传时才读取
    pub async fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or_default()
            .to_string();
        let size = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                debug!("无法读取文件信息 {:?}: {}", path, e);
                0
            }
        };

        Self {
            name,
            size,
            mime_type,
            source: FileSource::Disk(path.to_path_buf()),
        }
    }

    pub async fn read(&self) -> std::io::Result<Arc<[u8]>> {
        match &self.source {
            FileSource::Memory(data) => Ok(Arc::clone(data)),
            FileSource::Disk(path) => Ok(Arc::from(tokio::fs::read(path).await?)),
        }
    }

    /// 小写扩展名（不含点），没有扩展名时返回 `None`
    pub fn extension(&self) -> Option<String> {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_lowercase()),
            _ => None,
        }
    }

    // 声明类型无法解析时按文件名猜测，猜不出则用 application/octet-stream
    pub fn content_type(&self) -> String {
        match self.mime_type.trim().parse::<Mime>() {
            Ok(mime) => mime.to_string(),
            Err(_) => mime_guess::from_path(&self.name).first_or_octet_stream().to_string(),
        }
    }
}

// -----------------------------------------------------------------------------------------------

// 上传完成后的存储记录（与后端接口字段一致）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
    pub url: String,
    pub upload_date: DateTime<Utc>,
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 写入文档库的元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
    pub storage_url: String,
    pub uploader_id: String,
    pub project_id: Option<String>,
    pub tags: Vec<String>,
}
