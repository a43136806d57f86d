//! Multipart image uploads.

use reqwest::multipart::{Form, Part};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::UploadResponse;

impl ApiClient {
    /// Uploads a photo used as styling input. The file goes in the `image`
    /// form field.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] when the backend rejects the file (size or
    /// format); any other [`ApiError`] otherwise.
    pub async fn upload_style_image(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let form = image_form(file_name, mime_type, bytes)?;
        self.post_multipart("/products/upload/style-image/", form)
            .await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::upload_style_image`].
    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let form = image_form(file_name, mime_type, bytes)?;
        self.post_multipart("/products/upload/profile-picture/", form)
            .await
    }
}

fn image_form(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<Form, ApiError> {
    let part = Part::bytes(bytes)
        .file_name(file_name.to_owned())
        .mime_str(mime_type)?;
    Ok(Form::new().part("image", part))
}
