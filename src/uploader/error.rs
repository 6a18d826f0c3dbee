use thiserror::Error;

use super::task::UploadStatus;
use crate::services::registry::RegistryError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("网络请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("读取文件失败: {0}")]
    Io(#[from] std::io::Error),

    // 服务端返回的错误信息原样透出
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    #[error("无效的上传地址: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("任务未找到: {0}")]
    TaskNotFound(String),

    #[error("无效的状态转换: {from} -> {to}")]
    InvalidTransition { from: UploadStatus, to: UploadStatus },

    #[error("文档编号已写入，不能重复设置: {0}")]
    DocumentIdAlreadySet(String),

    #[error("任务仍在进行中，不能移除: {0}")]
    TaskActive(String),
}

// 单个任务在流水线中的失败原因
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
