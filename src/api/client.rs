//! Clip backend HTTP client.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::clip::GenerationRequest;

/// Path prefix the backend serves search results from.
pub const CLIP_MEDIA_PREFIX: &str = "temp_videos";

/// Path prefix the backend serves rendered videos from.
pub const FINAL_MEDIA_PREFIX: &str = "final_videos";

#[derive(Debug, Deserialize)]
struct FetchResponse {
    clips: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    video: String,
}

/// Client for the clip search / render backend.
#[derive(Debug, Clone)]
pub struct ClipClient {
    http: Client,
    base_url: String,
}

impl ClipClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed =
            Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{trimmed}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{trimmed}: scheme must be http or https"
            )));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Media URL for a search result.
    pub fn clip_url(&self, clip: &str) -> String {
        clip_media_url(&self.base_url, clip)
    }

    /// Media URL for a rendered video.
    pub fn final_video_url(&self, video: &str) -> String {
        final_media_url(&self.base_url, video)
    }

    /// Search clips by keyword. The keyword is sent as-is, even when empty.
    pub async fn search(&self, keyword: &str) -> ApiResult<Vec<String>> {
        let url = format!("{}/fetch", self.base_url);
        debug!(%url, keyword, "searching clips");

        let response = self
            .http
            .get(&url)
            .query(&[("keyword", keyword)])
            .send()
            .await?;

        let body: FetchResponse = decode(response).await?;
        info!(keyword, count = body.clips.len(), "search completed");
        Ok(body.clips)
    }

    /// Submit a render job and return the output video filename.
    pub async fn generate(&self, request: &GenerationRequest) -> ApiResult<String> {
        let url = format!("{}/generate", self.base_url);
        debug!(%url, clips = request.clips.len(), "submitting generation request");

        let form = request
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let response = self.http.post(&url).multipart(form).send().await?;

        let body: GenerateResponse = decode(response).await?;
        if body.video.trim().is_empty() {
            return Err(ApiError::InvalidResponse(
                "generate returned an empty video name".to_string(),
            ));
        }

        info!(video = %body.video, "generation completed");
        Ok(body.video)
    }
}

/// `{base}/temp_videos/{clip}`
pub fn clip_media_url(base_url: &str, clip: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        CLIP_MEDIA_PREFIX,
        clip
    )
}

/// `{base}/final_videos/{video}`
pub fn final_media_url(base_url: &str, video: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        FINAL_MEDIA_PREFIX,
        video
    )
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "backend request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
