use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{
    Body, Client, ClientBuilder,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use super::{UploadContext, UploadTransport};
use crate::common::models::{UploadFile, UploadedFile};
use crate::common::session::SessionStore;
use crate::uploader::error::TransportError;
use crate::uploader::progress::ProgressReporter;

pub const UPLOAD_PATH: &str = "api/documents/upload";
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// 真实上传：multipart 表单发送到后端
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    session: SessionStore,
}

impl HttpTransport {
    pub fn new(base_url: &Url, session: SessionStore) -> Result<Self, TransportError> {
        let endpoint = base_url.join(UPLOAD_PATH)?;
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .default_headers(Self::get_default_headers())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            session,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("metrika-uploader/", env!("CARGO_PKG_VERSION"))),
        );
        headers
    }

    fn build_form(
        file: &UploadFile,
        data: Arc<[u8]>,
        context: &UploadContext,
        progress: ProgressReporter,
    ) -> Result<Form, TransportError> {
        let mime = file.content_type();

        let size = data.len() as u64;
        let body = Body::wrap_stream(progress_stream(data, progress));
        let part = Part::stream_with_length(body, size)
            .file_name(file.name.clone())
            .mime_str(&mime)?;

        let mut form = Form::new()
            .part("file", part)
            .text("fileName", file.name.clone())
            .text("fileType", mime)
            .text("uploaderId", context.uploader_id.clone());
        if let Some(project_id) = &context.project_id {
            form = form.text("projectId", project_id.clone());
        }
        Ok(form)
    }

    async fn send(
        &self,
        file: &UploadFile,
        context: &UploadContext,
        progress: ProgressReporter,
    ) -> Result<UploadedFile, TransportError> {
        let data = file.read().await?;
        let form = Self::build_form(file, data, context, progress)?;

        let mut request = self.client.post(self.endpoint.clone()).multipart(form);
        if let Some(token) = self.session.load_token().await {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("Upload failed with status {}", status.as_u16()));
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<UploadedFile>()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

// 按块发送文件内容，每发出一块按已发送字节上报进度
fn progress_stream(
    data: Arc<[u8]>,
    progress: ProgressReporter,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + Sync + 'static {
    let total = data.len();
    let ranges: Vec<(usize, usize)> = (0..total)
        .step_by(CHUNK_SIZE)
        .map(|start| (start, (start + CHUNK_SIZE).min(total)))
        .collect();

    futures::stream::iter(ranges).map(move |(start, end)| {
        let percent = (end as u64 * 100 / total as u64) as u8;
        progress.report(percent);
        Ok(data[start..end].to_vec())
    })
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn transport(
        &self,
        file: &UploadFile,
        context: &UploadContext,
        progress: ProgressReporter,
    ) -> Result<UploadedFile, TransportError> {
        info!("开始上传: {} -> {}", file.name, self.endpoint);

        let result = self.send(file, context, progress.clone()).await;
        match &result {
            Ok(uploaded) => {
                progress.finish();
                debug!("上传成功: {} ({})", uploaded.name, uploaded.url);
            }
            Err(e) => {
                progress.close();
                error!("上传失败: {}: {}", file.name, e);
            }
        }
        result
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
