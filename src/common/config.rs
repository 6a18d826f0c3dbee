use std::path::PathBuf;

use thiserror::Error;
use url::Url;

// 构建期决定使用真实接口还是本地模拟，运行时不可切换
pub const USE_REAL_API: bool = cfg!(feature = "real-api");

pub const API_URL_ENV: &str = "METRIKA_API_URL";
pub const SESSION_FILE_ENV: &str = "METRIKA_SESSION_FILE";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无效的 API 地址 {url}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub use_real_api: bool,
    pub rng_seed: Option<u64>, // 模拟上传的随机进度种子
}

impl UploaderConfig {
    // 从环境变量读取配置，缺省时使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(API_URL_ENV) {
            config = config.with_api_url(&raw)?;
        }
        if let Ok(path) = std::env::var(SESSION_FILE_ENV) {
            config.session_file = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("默认 API 地址有效"),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            use_real_api: USE_REAL_API,
            rng_seed: None,
        }
    }
}

// 统一补上结尾的 '/'，保证 join 时保留路径前缀
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&normalized).map_err(|source| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        source,
    })
}
