//! Gemini API client
//!
//! One blocking-per-command call surface: upload a local file to the File
//! API, or send a generateContent request (optionally schema-constrained).
//! Uses a long-lived reqwest::Client for connection pooling. The
//! [`ModelBackend`] trait is the single narrow seam between the command
//! loop and the network, so tests swap in a mock.

use crate::config::Config;
use crate::error::AssistantError;
use crate::session::UploadedFile;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

//
// ================= Request wire types =================
//

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    pub fn file(file: &UploadedFile) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                file_uri: file.uri.clone(),
                mime_type: file.mime_type.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileData {
    pub file_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

//
// ================= Response wire types =================
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
    /// Set when the part is a model "thought" trace rather than output.
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileUploadResponse {
    file: FileResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
}

//
// ================= Reply =================
//

/// Assembled model reply: the answer text plus any thought-trace lines.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: String,
    pub thoughts: Vec<String>,
}

//
// ================= Backend seam =================
//

/// Narrow interface to the generative model service. The command loop only
/// ever talks to this, so the live client can be swapped for a mock (or an
/// async/queued implementation) without touching loop logic.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> crate::Result<ModelReply>;
    async fn upload(&self, path: &Path) -> crate::Result<UploadedFile>;
}

//
// ================= Client =================
//

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            // A hung upstream should surface as a Generation error, not
            // wedge the prompt forever.
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: config.api_key,
            model: config.model,
            base_url: BASE_URL.to_string(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key)
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> crate::Result<ModelReply> {
        info!(model = %self.model, "Calling Gemini API");

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                AssistantError::Generation(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Gemini API error response: {}", error_text);
            return Err(AssistantError::Generation(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let reply: GenerateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AssistantError::Generation(format!("Gemini parse error: {}", e))
        })?;

        let candidate = reply.candidates.into_iter().next().ok_or_else(|| {
            AssistantError::Generation("No response from Gemini API".to_string())
        })?;

        let mut assembled = ModelReply::default();
        for part in candidate.content.parts {
            let Some(text) = part.text else { continue };
            if part.thought.unwrap_or(false) {
                assembled.thoughts.push(text);
            } else {
                assembled.text.push_str(&text);
            }
        }

        if assembled.text.is_empty() && assembled.thoughts.is_empty() {
            return Err(AssistantError::Generation(
                "Empty response from Gemini".to_string(),
            ));
        }

        Ok(assembled)
    }

    async fn upload(&self, path: &Path) -> crate::Result<UploadedFile> {
        let bytes = std::fs::read(path).map_err(|e| {
            AssistantError::Upload(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let mime_type = detect_mime_type(path);

        info!(path = %path.display(), size = bytes.len(), "Uploading file to Gemini File API");

        let mut request = self
            .client
            .post(self.upload_url())
            .header("X-Goog-Upload-Protocol", "raw")
            .body(bytes);

        if let Some(mime) = &mime_type {
            request = request.header("Content-Type", mime.clone());
        }

        let response = request.send().await.map_err(|e| {
            error!("File upload request failed: {}", e);
            AssistantError::Upload(format!("Upload failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Upload(format!(
                "Upload failed ({}): {}",
                status, error_text
            )));
        }

        let uploaded: FileUploadResponse = response.json().await.map_err(|e| {
            AssistantError::Upload(format!("Upload response parse error: {}", e))
        })?;

        Ok(UploadedFile {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
            mime_type: uploaded.file.mime_type.or(mime_type),
            display_name: path.display().to_string(),
        })
    }
}

/// Infer a MIME type from the file extension. PDFs and common image
/// formats are recognized; anything else uploads as raw bytes.
fn detect_mime_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf".to_string()),
        "png" => Some("image/png".to_string()),
        "jpg" | "jpeg" => Some("image/jpeg".to_string()),
        _ => None,
    }
}
