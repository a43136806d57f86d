use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported image type '{0}' (JPG, PNG and WebP only)")]
    UnsupportedType(String),

    #[error("image is too large: {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("I/O error reading image: {0}")]
    Io(#[from] std::io::Error),

    #[error("image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
