use tracing::debug;

use crate::common::models::UploadFile;

// PDF, Word, Excel, PowerPoint 和纯文本
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
];

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt"];

// 先看声明类型，各平台 MIME 检测不可靠，再回退到扩展名
pub fn validate(file: &UploadFile) -> bool {
    if is_allowed_mime(&file.mime_type) {
        return true;
    }

    file.extension()
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn is_allowed_mime(mime_type: &str) -> bool {
    // 去掉参数部分，如 "text/plain; charset=utf-8"
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    !essence.is_empty() && ALLOWED_MIME_TYPES.contains(&essence.as_str())
}

/// 把一批文件分成可上传的文件和被拒绝的文件名，保持原有顺序
pub fn partition(files: Vec<UploadFile>) -> (Vec<UploadFile>, Vec<String>) {
    let mut accepted = Vec::with_capacity(files.len());
    let mut rejected = Vec::new();

    for file in files {
        if validate(&file) {
            accepted.push(file);
        } else {
            debug!("不支持的文件类型: {} ({})", file.name, file.mime_type);
            rejected.push(file.name);
        }
    }

    (accepted, rejected)
}
