use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use base64::Engine;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, error, info};

use super::{UploadContext, UploadTransport};
use crate::common::models::{UploadFile, UploadedFile};
use crate::uploader::clock::Clock;
use crate::uploader::error::TransportError;
use crate::uploader::progress::ProgressReporter;

// 超过 1 MiB 不再内嵌数据，避免撑爆本地存储配额
pub const EMBED_SIZE_LIMIT: u64 = 1024 * 1024;
pub const PROGRESS_TICK: Duration = Duration::from_millis(100);
pub const COMPLETION_DELAY: Duration = Duration::from_millis(300);
pub const PROGRESS_CAP: u8 = 95;
pub const MIN_STEP: u8 = 5;
pub const MAX_STEP: u8 = 20;

// 本地模拟上传：数据转成 data URL，进度由定时器合成
pub struct SimulatedTransport {
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl SimulatedTransport {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self {
            clock,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn next_step(&self) -> u8 {
        match self.rng.lock() {
            Ok(mut rng) => rng.random_range(MIN_STEP..=MAX_STEP),
            Err(poisoned) => poisoned.into_inner().random_range(MIN_STEP..=MAX_STEP),
        }
    }

    fn storage_url(id: &str, file: &UploadFile, data: &[u8]) -> String {
        if data.len() as u64 > EMBED_SIZE_LIMIT {
            debug!("文件超过内嵌上限，使用占位地址: {} ({} 字节)", file.name, data.len());
            return placeholder_url(id, &file.name);
        }
        data_url(&file.content_type(), data)
    }
}

pub fn data_url(mime: &str, data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    format!("data:{};base64,{}", mime, encoded)
}

pub fn placeholder_url(id: &str, name: &str) -> String {
    let safe_name: String = name
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' { '_' } else { c })
        .collect();
    format!("/uploads/{}/{}", id, safe_name)
}

#[async_trait]
impl UploadTransport for SimulatedTransport {
    async fn transport(
        &self,
        file: &UploadFile,
        _context: &UploadContext,
        progress: ProgressReporter,
    ) -> Result<UploadedFile, TransportError> {
        info!("开始模拟上传: {} ({} 字节)", file.name, file.size);

        let data = match file.read().await {
            Ok(data) => data,
            Err(e) => {
                progress.close();
                error!("读取文件失败: {}: {}", file.name, e);
                return Err(e.into());
            }
        };

        let id = uuid::Uuid::new_v4().to_string();
        let url = Self::storage_url(&id, file, &data);

        // 每个 tick 前进 5-20，封顶 95，完成延时结束后跳到 100
        let mut current = 0u8;
        let mut elapsed = Duration::ZERO;
        while elapsed < COMPLETION_DELAY {
            self.clock.sleep(PROGRESS_TICK).await;
            elapsed += PROGRESS_TICK;
            current = current.saturating_add(self.next_step()).min(PROGRESS_CAP);
            progress.report(current);
        }
        progress.finish();

        Ok(UploadedFile {
            id,
            name: file.name.clone(),
            file_type: file.content_type(),
            size: data.len() as u64,
            url,
            upload_date: self.clock.now(),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
