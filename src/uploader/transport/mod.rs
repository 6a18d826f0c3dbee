use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::clock::Clock;
use super::error::TransportError;
use super::progress::ProgressReporter;
use crate::common::config::UploaderConfig;
use crate::common::models::{UploadFile, UploadedFile};
use crate::common::session::SessionStore;

pub mod http;
pub mod simulated;

pub use http::HttpTransport;
pub use simulated::SimulatedTransport;

// 上传者信息，真实接口会作为表单字段发送
#[derive(Debug, Clone, Default)]
pub struct UploadContext {
    pub uploader_id: String,
    pub project_id: Option<String>,
}

/// 把单个文件的内容送到存储
///
/// 实现通过 `progress` 上报进度：单调不减，成功时恰好以 100 结束，返回后不再上报。
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn transport(
        &self,
        file: &UploadFile,
        context: &UploadContext,
        progress: ProgressReporter,
    ) -> Result<UploadedFile, TransportError>;

    fn name(&self) -> &'static str;
}

// 启动时按构建配置选择一次，之后所有上传都走同一实现
pub fn from_config(
    config: &UploaderConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn UploadTransport>, TransportError> {
    let transport: Arc<dyn UploadTransport> = if config.use_real_api {
        let session = SessionStore::new(&config.session_file);
        Arc::new(HttpTransport::new(&config.api_base_url, session)?)
    } else {
        match config.rng_seed {
            Some(seed) => Arc::new(SimulatedTransport::with_seed(clock, seed)),
            None => Arc::new(SimulatedTransport::new(clock)),
        }
    };

    info!("使用上传方式: {}", transport.name());
    Ok(transport)
}
