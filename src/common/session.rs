use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("会话文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("会话文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
}

// 本地持久化的登录状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    // 文件不存在视为未登录
    pub async fn load(&self) -> Result<SessionState, SessionError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("会话文件不存在: {:?}", self.path);
                return Ok(SessionState::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn save(&self, state: &SessionState) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, data).await?;
        info!("会话已保存: {:?}", self.path);
        Ok(())
    }

    // 读取失败时按未登录处理，只记录警告
    pub async fn load_token(&self) -> Option<String> {
        match self.load().await {
            Ok(state) => state.token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!("读取会话失败，将不携带认证信息: {}", e);
                None
            }
        }
    }
}
