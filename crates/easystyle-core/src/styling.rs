use serde::{Deserialize, Serialize};

/// Output of one styling request: the generated image and the outfit
/// description it was conditioned on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledResult {
    /// Base64 image payload, without a `data:` prefix.
    pub image_data: String,
    pub image_mime_type: String,
    pub description: String,
}
