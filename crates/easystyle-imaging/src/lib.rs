//! Local image preprocessing: validation, bounded resize and re-encode,
//! and square thumbnails. Everything here is CPU-bound; use
//! [`optimize_image_async`] from async code.

mod error;
mod optimize;
mod validate;

pub use error::ImageError;
pub use optimize::{
    create_thumbnail, optimize_image, optimize_image_async, scaled_dimensions, OptimizeOptions,
    OptimizedImage, OutputFormat,
};
pub use validate::{image_size_kb, validate_image_file, ImageFile, ACCEPTED_MIME_TYPES, MAX_IMAGE_BYTES};
