use anyhow::{Context, Result, anyhow};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::data_uri::DecodedImage;
use crate::form::ReimbursementForm;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const IMAGE_PART_NAME: &str = "image";
const IMAGE_FILE_NAME: &str = "receipt.png";

/// Extracted receipt fields as returned by the OCR endpoint. Every field is
/// optional from this side; values are rendered verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrFields {
    pub or_number: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub amount_paid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub status: String,
    #[serde(rename = "updatedRange")]
    pub updated_range: String,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /ocr` with `{ "image": <encoded image string> }`.
    pub async fn request_ocr(&self, image: &str) -> Result<OcrFields> {
        let url = format!("{}/ocr", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "image": image }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!(
                "OCR endpoint error ({}): {}",
                status,
                extract_backend_error(&text).unwrap_or(text)
            ));
        }
        parse_ocr_response(&text)
    }

    /// `POST /submit` with the form fields plus the decoded image as the
    /// binary `image` part.
    pub async fn submit(
        &self,
        form: &ReimbursementForm,
        image: DecodedImage,
    ) -> Result<SubmissionResult> {
        let url = format!("{}/submit", self.base_url);
        let mut payload = multipart::Form::new();
        for (key, value) in form.fields() {
            payload = payload.text(key, value.to_string());
        }
        let part = multipart::Part::bytes(image.bytes)
            .file_name(IMAGE_FILE_NAME)
            .mime_str(&image.mime)
            .with_context(|| format!("invalid mime '{}' for image part", image.mime))?;
        payload = payload.part(IMAGE_PART_NAME, part);

        let response = self.client.post(&url).multipart(payload).send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!(
                "submission endpoint error ({}): {}",
                status,
                extract_backend_error(&text).unwrap_or(text)
            ));
        }
        parse_submission_response(&text)
    }
}

/// Flag wins over `RECEIPT_BACKEND_URL`, which wins over settings.
pub fn resolve_base_url(flag: Option<&str>, settings: Option<&str>) -> String {
    if let Some(url) = non_empty(flag) {
        return url.to_string();
    }
    if let Ok(url) = std::env::var("RECEIPT_BACKEND_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }
    if let Some(url) = non_empty(settings) {
        return url.to_string();
    }
    DEFAULT_BASE_URL.to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_ocr_response(text: &str) -> Result<OcrFields> {
    serde_json::from_str(text).with_context(|| "failed to parse OCR response JSON")
}

fn parse_submission_response(text: &str) -> Result<SubmissionResult> {
    serde_json::from_str(text).with_context(|| "failed to parse submission response JSON")
}

fn extract_backend_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.filter(|message| !message.trim().is_empty())
}
