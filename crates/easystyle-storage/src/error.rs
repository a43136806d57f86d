use thiserror::Error;

/// Failures raised by a [`crate::KeyValueStore`] backend.
///
/// These never escape [`crate::SafeStorage`]; they exist so backends can say
/// what went wrong for the log line.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend is unavailable")]
    Unavailable,

    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WishlistError {
    #[error("product is already in the wishlist: {product_url}")]
    DuplicateItem { product_url: String },

    #[error("wishlist could not be saved")]
    WriteFailed,
}
