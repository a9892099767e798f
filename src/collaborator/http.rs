//! HTTP client for the recognition/translation backend
//!
//! `POST /process_region` crops, recognizes and translates one region.
//! `POST /clear_cache` drops the backend's translation context.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use super::{RecognitionResult, RegionSubmitter};
use crate::config::{MangaLensConfig, TranslationMethod};
use crate::domain::Region;

#[derive(Debug, Serialize)]
struct ProcessRegionRequest<'a> {
    image: &'a str,
    region: Region,
    method: TranslationMethod,
}

#[derive(Debug, Deserialize)]
struct ProcessRegionResponse {
    text: String,
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// [`RegionSubmitter`] talking JSON over HTTP
#[derive(Clone, Debug)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    base_url: String,
    method: TranslationMethod,
}

impl HttpSubmitter {
    pub fn new(base_url: impl Into<String>, method: TranslationMethod) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            method,
        }
    }

    pub fn from_config(config: &MangaLensConfig) -> Self {
        Self::new(config.backend_url(), config.translation_method)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn method(&self) -> TranslationMethod {
        self.method
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Reset the backend's translation context
    pub async fn clear_cache(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.endpoint("clear_cache"))
            .send()
            .await
            .context("sending clear_cache request")?;
        let status = response.status();
        let body = response.text().await.context("reading clear_cache response")?;
        if !status.is_success() {
            bail!("clear_cache failed ({status}): {}", error_message(&body));
        }
        log::info!("Backend translation cache cleared");
        Ok(())
    }
}

impl RegionSubmitter for HttpSubmitter {
    async fn submit(&self, image_source: &str, region: Region) -> anyhow::Result<RecognitionResult> {
        log::info!(
            "Submitting region {:?} of {} ({})",
            region,
            image_source,
            self.method.label()
        );
        let request = ProcessRegionRequest {
            image: image_source,
            region,
            method: self.method,
        };
        let response = self
            .client
            .post(self.endpoint("process_region"))
            .json(&request)
            .send()
            .await
            .context("sending process_region request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("reading process_region response")?;
        if !status.is_success() {
            bail!("process_region failed ({status}): {}", error_message(&body));
        }
        parse_process_response(&body)
    }
}

fn parse_process_response(body: &str) -> anyhow::Result<RecognitionResult> {
    let response: ProcessRegionResponse =
        serde_json::from_str(body).context("decoding process_region response")?;
    Ok(RecognitionResult {
        recognized_text: response.text,
        translated_text: response.translated_text,
    })
}

/// Pull the `error` field out of a failure body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
