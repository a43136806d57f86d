use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::ImageError;
use crate::validate::ImageFile;

const THUMBNAIL_QUALITY: u8 = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    /// Lossless; quality is ignored.
    Webp,
}

impl OutputFormat {
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
    pub format: OutputFormat,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            quality: 80,
            format: OutputFormat::Jpeg,
        }
    }
}

/// Re-encoded image ready to send to the AI service.
#[derive(Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    /// `bytes` as standard base64, no prefix.
    pub base64: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for OptimizedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizedImage")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl OptimizedImage {
    /// Self-contained `data:` URL for display.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Target size after fitting `width`×`height` inside the bounds.
///
/// Images already within both bounds keep their size. Otherwise both axes
/// scale by the same factor, floored, and never below 1.
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let (w, h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));
    // Integer floor of dim * min(max_w / w, max_h / h).
    let (new_w, new_h) = if w * max_h >= h * max_w {
        (max_w, h * max_w / w)
    } else {
        (w * max_h / h, max_h)
    };
    let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX).max(1);
    (clamp(new_w), clamp(new_h))
}

/// Decodes, downsizes to fit the bounds, and re-encodes.
///
/// # Errors
///
/// - [`ImageError::Decode`] if the bytes are not a readable image.
/// - [`ImageError::Encode`] if the output format cannot be written.
pub fn optimize_image(file: &ImageFile, options: &OptimizeOptions) -> Result<OptimizedImage, ImageError> {
    let img = decode(file)?;
    let (width, height) =
        scaled_dimensions(img.width(), img.height(), options.max_width, options.max_height);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let bytes = encode(&resized, options.format, options.quality)?;
    tracing::debug!(
        name = %file.name,
        original_bytes = file.bytes.len(),
        optimized_bytes = bytes.len(),
        width,
        height,
        "image optimized"
    );
    Ok(OptimizedImage {
        base64: STANDARD.encode(&bytes),
        bytes,
        mime_type: options.format.mime_type(),
        width,
        height,
    })
}

/// [`optimize_image`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`optimize_image`], plus [`ImageError::Task`] if the worker panics.
pub async fn optimize_image_async(
    file: ImageFile,
    options: OptimizeOptions,
) -> Result<OptimizedImage, ImageError> {
    tokio::task::spawn_blocking(move || optimize_image(&file, &options)).await?
}

/// Centre-cropped square thumbnail of `size`×`size` as a JPEG `data:` URL.
///
/// # Errors
///
/// [`ImageError::Decode`] or [`ImageError::Encode`].
pub fn create_thumbnail(file: &ImageFile, size: u32) -> Result<String, ImageError> {
    let img = decode(file)?;
    let side = img.width().min(img.height());
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;
    let thumb = img
        .crop_imm(x, y, side, side)
        .resize_exact(size.max(1), size.max(1), FilterType::Triangle);
    let bytes = encode(&thumb, OutputFormat::Jpeg, THUMBNAIL_QUALITY)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes)))
}

fn decode(file: &ImageFile) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(&file.bytes).map_err(|source| ImageError::Decode {
        name: file.name.clone(),
        source,
    })
}

fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            encoder
                .encode_image(&img.to_rgb8())
                .map_err(ImageError::Encode)?;
        }
        OutputFormat::Png => img
            .write_with_encoder(PngEncoder::new(&mut out))
            .map_err(ImageError::Encode)?,
        OutputFormat::Webp => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_with_encoder(WebPEncoder::new_lossless(&mut out))
            .map_err(ImageError::Encode)?,
    }
    Ok(out.into_inner())
}
