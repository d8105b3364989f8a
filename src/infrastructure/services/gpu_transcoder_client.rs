// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::TranscoderSettings;
use crate::domain::services::transcoder::{
    JobStatusReport, ThumbnailRequest, TranscodeRequest, TranscoderClient, TranscoderError,
};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: String,
}

/// GPU 转码服务的 HTTP 客户端
///
/// 无状态，配置了 API 密钥时随每个请求发送 `X-API-Key`
pub struct GpuTranscoderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GpuTranscoderClient {
    /// 创建新的转码客户端
    pub fn new(settings: &TranscoderSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone().filter(|key| !key.is_empty()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TranscoderError> {
        let request = match &self.api_key {
            Some(key) => request.header("X-API-Key", key),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| TranscoderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscoderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TranscoderError::Request(e.to_string()))
    }
}

#[async_trait]
impl TranscoderClient for GpuTranscoderClient {
    async fn submit_transcode(&self, request: &TranscodeRequest) -> Result<String, TranscoderError> {
        debug!("Submitting transcode for video {}", request.video_id);
        let response: SubmitResponse = self
            .send(self.client.post(self.url("/api/transcode")).json(request))
            .await?;
        Ok(response.job_id)
    }

    async fn submit_thumbnail(&self, request: &ThumbnailRequest) -> Result<String, TranscoderError> {
        debug!("Submitting thumbnail for video {}", request.video_id);
        let response: SubmitResponse = self
            .send(self.client.post(self.url("/api/thumbnail")).json(request))
            .await?;
        Ok(response.job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, TranscoderError> {
        self.send(self.client.get(self.url(&format!("/api/jobs/{}", job_id))))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str, api_key: Option<&str>) -> TranscoderSettings {
        TranscoderSettings {
            base_url: format!("{}/", base_url),
            api_key: api_key.map(str::to_string),
            timeout_seconds: 5,
            poll_interval_seconds: 30,
            output_dir: "/srv/out".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_transcode_sends_api_key_and_body() {
        let server = MockServer::start().await;
        let video_id = Uuid::new_v4();

        Mock::given(method("POST"))
            .and(path("/api/transcode"))
            .and(header("X-API-Key", "secret-key"))
            .and(body_json(json!({
                "video_id": video_id,
                "input_path": "/srv/in/a.mp4",
                "output_dir": "/srv/out/a"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "job-42" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GpuTranscoderClient::new(&settings(&server.uri(), Some("secret-key")));
        let job_id = client
            .submit_transcode(&TranscodeRequest {
                video_id,
                input_path: "/srv/in/a.mp4".to_string(),
                output_dir: "/srv/out/a".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(job_id, "job-42");
    }

    #[tokio::test]
    async fn test_job_status_and_error_mapping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "processing",
                "progress": 35
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/thumbnail"))
            .respond_with(ResponseTemplate::new(503).set_body_string("gpu busy"))
            .mount(&server)
            .await;

        let client = GpuTranscoderClient::new(&settings(&server.uri(), None));

        let report = client.job_status("job-1").await.unwrap();
        assert_eq!(report.status, "processing");
        assert_eq!(report.progress, 35);
        assert!(report.output_path.is_none());

        let err = client
            .submit_thumbnail(&ThumbnailRequest {
                video_id: Uuid::new_v4(),
                input_path: "/srv/in/a.mp4".to_string(),
                timestamp: 1.0,
            })
            .await
            .unwrap_err();
        match err {
            TranscoderError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "gpu busy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = GpuTranscoderClient::new(&settings("http://127.0.0.1:9", None));
        let err = client.job_status("missing").await.unwrap_err();
        assert!(matches!(err, TranscoderError::Request(_)));
    }
}
