use async_trait::async_trait;
use easystyle_core::StyledResult;
use easystyle_imaging::OptimizedImage;

use crate::error::GenerationError;

/// Base64 image payload plus MIME type, as exchanged with the model.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl InlineImage {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

impl From<&OptimizedImage> for InlineImage {
    fn from(image: &OptimizedImage) -> Self {
        Self::new(image.mime_type, image.base64.clone())
    }
}

impl From<&StyledResult> for InlineImage {
    fn from(result: &StyledResult) -> Self {
        Self::new(result.image_mime_type.clone(), result.image_data.clone())
    }
}

/// Text and image generation, optionally conditioned on an input image.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the model's text reply, trimmed.
    async fn generate_text(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, GenerationError>;

    /// Returns the first image in the model's reply.
    async fn generate_image(
        &self,
        image: &InlineImage,
        prompt: &str,
    ) -> Result<InlineImage, GenerationError>;
}
