use base64::{engine::general_purpose::STANDARD, Engine as _};
use redditcast_core::{BroadcastError, CaptionError};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

/// Artifact string the captioning model leaks into its output.
const CAPTION_ARTIFACT: &str = "arafed";

const CAPTION_PATH: &str = "/api/caption";

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
    #[serde(default)]
    thumbnail: Option<String>,
}

/// Caption plus the image (as a data URI) to attach alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionedImage {
    pub caption: String,
    pub image: String,
}

/// Client for the host's captioning service.
#[derive(Debug)]
pub struct CaptionClient {
    http_client: Client,
    api_base: String,
}

impl CaptionClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Download the raw image bytes from a post's URL.
    pub async fn download_image(&self, image_url: &str) -> Result<Vec<u8>, BroadcastError> {
        debug!("Downloading image from {}", image_url);
        let response = self.http_client.get(image_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("Image download failed with status {} for {}", status, image_url);
            return Err(CaptionError::DownloadFailed {
                status_code: status.as_u16(),
            }
            .into());
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Send an image to the captioning endpoint and return the scrubbed
    /// caption with the image to attach (service thumbnail when offered,
    /// otherwise the upload itself).
    pub async fn caption_image(&self, image: &[u8]) -> Result<CaptionedImage, BroadcastError> {
        let encoded = STANDARD.encode(image);

        let mut endpoint = Url::parse(&self.api_base)?;
        endpoint.set_path(CAPTION_PATH);

        let response = self
            .http_client
            .post(endpoint)
            .header("Bypass-Tunnel-Reminder", "bypass")
            .json(&serde_json::json!({ "image": &encoded }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Caption request failed with status {}", status);
            return Err(CaptionError::ServiceError {
                status_code: status.as_u16(),
            }
            .into());
        }

        let body: CaptionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse caption response: {}", e);
            CaptionError::InvalidResponse {
                details: e.to_string(),
            }
        })?;

        let caption = scrub_caption(&body.caption);
        info!("Received caption: {}", caption);
        Ok(CaptionedImage {
            caption,
            image: image_for_message(body.thumbnail, &encoded),
        })
    }
}

/// Strip every occurrence of the known model artifact from a caption.
/// Removal can splice the surrounding text back into the artifact, so
/// scrubbing repeats until none is left.
pub fn scrub_caption(caption: &str) -> String {
    let mut scrubbed = caption.replace(CAPTION_ARTIFACT, "");
    while scrubbed.contains(CAPTION_ARTIFACT) {
        scrubbed = scrubbed.replace(CAPTION_ARTIFACT, "");
    }
    scrubbed
}

/// Prefer the service's thumbnail over re-sending the full upload.
fn image_for_message(thumbnail: Option<String>, encoded_upload: &str) -> String {
    match thumbnail {
        Some(thumbnail) => format!("data:image/jpeg;base64,{thumbnail}"),
        None => format!("data:image/jpeg;base64,{encoded_upload}"),
    }
}
