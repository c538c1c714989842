//! Text extraction through the Gemini `generateContent` endpoint.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use exampaper::{ExtractionError, ImageInput, Locale, TextExtractor};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// OCR collaborator backed by a Gemini vision model.
pub struct GeminiExtractor {
    api_key: String,
    model: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl GeminiExtractor {
    /// Create an extractor for the default model.
    pub fn new(api_key: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    /// Use another model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }

    async fn generate(
        &self,
        image: &ImageInput,
        locale: Locale,
    ) -> Result<String, ExtractionError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: locale.labels().ocr_prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: BASE64_STANDARD.encode(&image.data),
                        },
                    },
                ],
            }],
        };

        log::debug!("sending {} ({} bytes) to {}", image.name, image.len(), self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractionError::new(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body)
                .unwrap_or_else(|| format!("request failed with {}", status));
            return Err(ExtractionError::new(message).with_status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::new(format!("invalid response: {}", e.without_url())))?;
        body.text()
            .ok_or_else(|| ExtractionError::new(locale.labels().extraction_error))
    }
}

impl TextExtractor for GeminiExtractor {
    fn extract_text(&self, image: &ImageInput, locale: Locale) -> Result<String, ExtractionError> {
        self.runtime.block_on(self.generate(image, locale))
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
