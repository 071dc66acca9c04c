use crate::constants::{WEBP_EFFORT, WEBP_QUALITY};
use crate::error::{PipelineError, Result};
use image::{ColorType, DynamicImage, ImageReader};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub quality: u8,
    pub effort: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: WEBP_QUALITY,
            effort: WEBP_EFFORT,
        }
    }
}

/// Turns one image file into one compressed file.
pub trait Codec {
    fn encode(&self, input: &Path, output: &Path, options: &EncodeOptions) -> Result<()>;
}

/// Lossy WebP encoder backed by libwebp.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl Codec for WebpCodec {
    fn encode(&self, input: &Path, output: &Path, options: &EncodeOptions) -> Result<()> {
        let img = ImageReader::open(input)?.with_guessed_format()?.decode()?;
        let img = to_encodable(img);

        let encoder = webp::Encoder::from_image(&img)
            .map_err(|e| PipelineError::Encode(e.to_string()))?;

        let mut config = webp::WebPConfig::new()
            .map_err(|_| PipelineError::Encode("failed to initialise encoder config".to_string()))?;
        config.lossless = 0;
        config.quality = f32::from(options.quality);
        config.method = i32::from(options.effort);

        let encoded = encoder
            .encode_advanced(&config)
            .map_err(|e| PipelineError::Encode(format!("{:?}", e)))?;

        fs::write(output, &*encoded)?;
        debug!(
            "Encoded {:?} -> {:?} ({} bytes, q={}, effort={})",
            input,
            output,
            encoded.len(),
            options.quality,
            options.effort
        );
        Ok(())
    }
}

/// libwebp only accepts 8-bit RGB and RGBA buffers.
fn to_encodable(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => img,
        color if color.has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}
