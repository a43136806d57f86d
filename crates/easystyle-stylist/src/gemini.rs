//! REST client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use easystyle_core::AppConfig;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::model::{GenerativeModel, InlineImage};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini client holding one model for text and one for image output.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingApiKey`] when no key is configured,
    /// otherwise see [`GeminiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        Self::with_base_url(
            api_key,
            &config.gemini_base_url,
            &config.text_model,
            &config.image_model,
            config.ai_timeout_secs,
        )
    }

    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GenerationError::InvalidUrl`] for an unparsable base URL.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        text_model: &str,
        image_model: &str,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("easystyle/0.1")
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)
            .map_err(|e| GenerationError::InvalidUrl(format!("'{base_url}': {e}")))?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            text_model: text_model.to_owned(),
            image_model: image_model.to_owned(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    #[tracing::instrument(skip(self, request))]
    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, GenerationError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), "generateContent response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP Error: {}", status.as_u16()));
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::Deserialize {
            context: format!("generateContent({model})"),
            source: e,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, GenerationError> {
        let request = GenerateRequest::new(image, prompt, None);
        let response = self.generate(&self.text_model, &request).await?;
        response.text().ok_or(GenerationError::EmptyResponse("text"))
    }

    async fn generate_image(
        &self,
        image: &InlineImage,
        prompt: &str,
    ) -> Result<InlineImage, GenerationError> {
        let config = GenerationConfig {
            response_modalities: vec!["IMAGE", "TEXT"],
        };
        let request = GenerateRequest::new(Some(image), prompt, Some(config));
        let response = self.generate(&self.image_model, &request).await?;
        response
            .first_image()
            .ok_or(GenerationError::EmptyResponse("image"))
    }
}

// ---------------------------------------------------------------------------
// wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateRequest<'a> {
    /// Single user turn: the image part (if any) followed by the text.
    fn new(
        image: Option<&'a InlineImage>,
        text: &'a str,
        generation_config: Option<GenerationConfig>,
    ) -> Self {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            parts.push(RequestPart::Inline {
                inline_data: InlineDataRef {
                    mime_type: &image.mime_type,
                    data: &image.data,
                },
            });
        }
        parts.push(RequestPart::Text { text });
        Self {
            contents: vec![Content { parts }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataRef<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    /// Concatenated text parts of the first candidate, or `None` if blank.
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    fn first_image(&self) -> Option<InlineImage> {
        self.parts()
            .find_map(|p| p.inline_data.as_ref())
            .filter(|d| !d.data.is_empty())
            .map(|d| InlineImage::new(d.mime_type.clone(), d.data.clone()))
    }
}
