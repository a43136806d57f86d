use easystyle_api::ApiError;
use easystyle_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("login required")]
    NotAuthenticated,

    /// The session changed while the request was in flight; its result was
    /// dropped.
    #[error("session changed before the response arrived")]
    SessionChanged,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to open local storage: {0}")]
    Storage(#[from] StorageError),
}
