//! Document upload and analysis pipeline for the Metrika dashboard.

pub mod common;
pub mod services;
pub mod uploader;

pub use common::config::UploaderConfig;
pub use common::models::{DocumentId, DocumentMetadata, UploadFile, UploadedFile};
pub use uploader::{BatchReport, TaskStore, UploadOptions, UploadQueue, UploadStatus, UploadTask};
