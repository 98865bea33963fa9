//! Embedded photo and logo decoding.
//!
//! Photos arrive as bare base64 or as data URIs. Decoding happens in two
//! stages, payload then bitmap, and either stage may reject an entry.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Longest edge kept when embedding a bitmap into the PDF.
const MAX_EMBED_EDGE_PX: u32 = 1600;

/// A decoded bitmap ready to embed: 8-bit RGB, row-major, no alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl ReportImage {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Largest `(width, height)` with the image's aspect ratio inside the box.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect = self.aspect_ratio();
        if max_width / max_height > aspect {
            (max_height * aspect, max_height)
        } else {
            (max_width, max_width / aspect)
        }
    }
}

/// Strip an optional data-URI prefix and base64-decode the rest.
pub fn decode_payload(entry: &str) -> Option<Vec<u8>> {
    let payload = match entry.split_once(',') {
        Some((_, rest)) => rest,
        None => entry,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    if payload.is_empty() {
        log::warn!("Skipping empty image payload");
        return None;
    }

    match BASE64.decode(payload.as_bytes()) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Skipping image with malformed base64: {}", e);
            None
        }
    }
}

/// Decode image bytes into a white-backed RGB bitmap.
pub fn decode_bitmap(bytes: &[u8]) -> Option<ReportImage> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Skipping undecodable image ({} bytes): {}", bytes.len(), e);
            return None;
        }
    };

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let img = if width.max(height) > MAX_EMBED_EDGE_PX {
        img.resize(MAX_EMBED_EDGE_PX, MAX_EMBED_EDGE_PX, FilterType::Triangle)
    } else {
        img
    };

    Some(flatten_on_white(&img))
}

/// Photo entry straight to bitmap.
pub fn decode_entry(entry: &str) -> Option<ReportImage> {
    decode_payload(entry).and_then(|bytes| decode_bitmap(&bytes))
}

fn flatten_on_white(img: &DynamicImage) -> ReportImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut background = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let rgb = DynamicImage::ImageRgba8(background).to_rgb8();

    ReportImage {
        width,
        height,
        rgb: rgb.into_raw(),
    }
}
