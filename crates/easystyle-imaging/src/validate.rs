use std::path::Path;

use crate::error::ImageError;

/// MIME types accepted for styling input.
pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// 10 MiB.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// A user-selected image: declared name and MIME type plus raw bytes.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, taking the MIME type from its extension.
    /// Unknown extensions get `application/octet-stream`, which validation
    /// rejects.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path)?;
        let mime_type = image::ImageFormat::from_path(path)
            .map_or("application/octet-stream", |f| f.to_mime_type());
        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, mime_type, bytes))
    }
}

/// Checks declared type and size. Does not look at the bytes.
///
/// # Errors
///
/// - [`ImageError::UnsupportedType`] for anything but JPEG, PNG or WebP.
/// - [`ImageError::TooLarge`] above [`MAX_IMAGE_BYTES`].
pub fn validate_image_file(file: &ImageFile) -> Result<(), ImageError> {
    if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ImageError::UnsupportedType(file.mime_type.clone()));
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            size: file.bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Size in KiB, rounded to nearest.
#[must_use]
pub fn image_size_kb(file: &ImageFile) -> usize {
    (file.bytes.len() + 512) / 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_types_within_limit() {
        for mime in ACCEPTED_MIME_TYPES {
            let file = ImageFile::new("photo", mime, vec![0; 1024]);
            assert!(validate_image_file(&file).is_ok(), "{mime} should be accepted");
        }
    }

    #[test]
    fn rejects_unsupported_type() {
        let file = ImageFile::new("photo.gif", "image/gif", vec![0; 10]);
        assert!(matches!(
            validate_image_file(&file),
            Err(ImageError::UnsupportedType(ref t)) if t == "image/gif"
        ));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = ImageFile::new("big.jpg", "image/jpeg", vec![0; MAX_IMAGE_BYTES]);
        assert!(validate_image_file(&at_limit).is_ok());

        let over = ImageFile::new("big.jpg", "image/jpeg", vec![0; MAX_IMAGE_BYTES + 1]);
        assert!(matches!(
            validate_image_file(&over),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn size_kb_rounds() {
        assert_eq!(image_size_kb(&ImageFile::new("a", "image/png", vec![0; 1536])), 2);
        assert_eq!(image_size_kb(&ImageFile::new("a", "image/png", vec![0; 1500])), 1);
    }
}
