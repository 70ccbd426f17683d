use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use thiserror::Error;

use crate::config::OcrConfig;
use crate::types::ImageQuality;

#[derive(Debug, Error)]
pub enum InvalidImageError {
    #[error("empty upload")]
    Empty,
    #[error("unsupported file extension: '{0}'")]
    UnsupportedExtension(String),
    #[error("file of {size} bytes exceeds upload limit of {max} bytes")]
    TooLarge { size: u64, max: u64 },
    #[error("image could not be decoded: {0}")]
    Undecodable(#[from] image::ImageError),
}

/// Reject uploads before any pixel work: empty files, extensions outside
/// the whitelist, and files over the configured byte ceiling.
pub fn validate(data: &[u8], filename: &str, config: &OcrConfig) -> Result<(), InvalidImageError> {
    if data.is_empty() {
        return Err(InvalidImageError::Empty);
    }
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if !config.extension_allowed(ext) {
        return Err(InvalidImageError::UnsupportedExtension(ext.to_string()));
    }
    let max = config.max_upload_bytes();
    if data.len() as u64 > max {
        return Err(InvalidImageError::TooLarge { size: data.len() as u64, max });
    }
    Ok(())
}

/// Turn an upload into an OCR-ready grayscale image: validate, decode,
/// downscale to the configured bounds, stretch contrast, sharpen.
/// With preprocessing disabled only validation, decoding, and the
/// grayscale conversion run — the output type is grayscale by contract.
pub fn normalize(
    data: &[u8],
    filename: &str,
    config: &OcrConfig,
) -> Result<GrayImage, InvalidImageError> {
    validate(data, filename, config)?;
    let img = image::load_from_memory(data)?;

    if !config.preprocessing {
        return Ok(img.to_luma8());
    }

    let img = resize_if_needed(img, config.max_width, config.max_height);
    let gray = img.to_luma8();
    let stretched = stretch_contrast(gray);
    Ok(sharpen(&stretched))
}

/// Pure grade of OCR fitness from dimensions alone.
pub fn assess_quality(width: u32, height: u32) -> ImageQuality {
    if width < 200 || height < 200 {
        ImageQuality::Poor
    } else if width >= 800 && height >= 600 {
        ImageQuality::Good
    } else {
        ImageQuality::Fair
    }
}

fn resize_if_needed(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() > max_width || img.height() > max_height {
        // `resize` preserves aspect ratio by applying the tighter of the
        // two scale factors.
        img.resize(max_width, max_height, image::imageops::FilterType::Lanczos3)
    } else {
        img
    }
}

/// Linear contrast stretch to the full 0–255 range. A narrow observed
/// range (< 50) is widened by ±20 first so faint thermal-paper scans
/// aren't stretched into noise.
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (min_px, max_px) = gray
        .pixels()
        .fold((255u8, 0u8), |(mn, mx), p| (mn.min(p[0]), mx.max(p[0])));

    if max_px == min_px {
        // Uniform image — nothing to stretch.
        return gray;
    }

    let (mut lo, mut hi) = (i32::from(min_px), i32::from(max_px));
    if hi - lo < 50 {
        lo = (lo - 20).max(0);
        hi = (hi + 20).min(255);
    }

    let range = (hi - lo) as f32;
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = i32::from(gray.get_pixel(x, y)[0]);
        let v = ((p - lo) as f32 * 255.0 / range).round().clamp(0.0, 255.0) as u8;
        Luma([v])
    })
}

/// 3×3 sharpen amplifying stroke edges. Border pixels are copied through
/// unmodified rather than extrapolated.
fn sharpen(gray: &GrayImage) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return gray.clone();
    }
    let mut out = gray.clone();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let v = 5 * i32::from(gray.get_pixel(x, y)[0])
                - i32::from(gray.get_pixel(x, y - 1)[0])
                - i32::from(gray.get_pixel(x, y + 1)[0])
                - i32::from(gray.get_pixel(x - 1, y)[0])
                - i32::from(gray.get_pixel(x + 1, y)[0]);
            out.put_pixel(x, y, Luma([v.clamp(0, 255) as u8]));
        }
    }
    out
}
