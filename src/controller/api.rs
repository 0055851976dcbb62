// HTTP client for the conversion service

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::errors::ControllerError;
use super::models::{ApiConfig, JobRequest, JobStatus, StartReply};
use super::traits::ConversionApi;

/// reqwest-backed client of the two documented operations:
/// `POST /download_start` and `GET /download_status/{id}`.
pub struct HttpConversionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConversionApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ControllerError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds as u64));

        if let Some(proxy_url) = config.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                ControllerError::Transport(format!("invalid proxy {}: {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            ControllerError::Transport(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ConversionApi for HttpConversionApi {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn start_job(&self, request: &JobRequest) -> Result<String, ControllerError> {
        let url = format!("{}/download_start", self.base_url);
        debug!("POST {} ({} as {})", url, request.url, request.format);

        let reply: StartReply = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .json()
            .await?;

        reply.into_job_id()
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ControllerError> {
        let url = format!("{}/download_status/{}", self.base_url, job_id);
        debug!("GET {}", url);

        let status: JobStatus = self.client.get(&url).send().await?.json().await?;
        Ok(status)
    }

    fn file_url(&self, filename: &str) -> String {
        format!("{}/get_file/{}", self.base_url, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ApiConfig::default().with_base_url("http://media.local:8000/");
        let api = HttpConversionApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://media.local:8000");
        assert_eq!(
            api.file_url("song.mp3"),
            "http://media.local:8000/get_file/song.mp3"
        );
    }

    #[test]
    fn test_invalid_proxy_is_reported() {
        let config = ApiConfig::default().with_proxy(Some("not a proxy".to_string()));
        assert!(HttpConversionApi::new(&config).is_err());
    }
}
