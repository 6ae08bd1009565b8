//! Binary media payloads.
//!
//! # Design
//! Non-JSON bodies go through `MediaDecoder`, picked by constructing the
//! client with it rather than by content negotiation. `Image` recognizes the
//! common web formats by their magic bytes and keeps the payload as-is; it
//! does not rasterize. PNG and GIF carry their pixel size in a fixed header
//! position, so those two report dimensions.

use crate::decoder::{DecodeError, Decoder};

/// A type that can be decoded from a raw media body.
pub trait Media: Sized {
    fn decode(data: &[u8]) -> Result<Self, DecodeError>;
}

/// Decodes bodies through the target type's `Media` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaDecoder;

impl<T: Media> Decoder<T> for MediaDecoder {
    fn decode(&self, data: &[u8]) -> Result<T, DecodeError> {
        T::decode(data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
}

impl ImageFormat {
    /// Identify the format from the leading bytes of `data`.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

        if data.starts_with(PNG) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            Some(ImageFormat::WebP)
        } else if data.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

/// An encoded image downloaded as a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub format: ImageFormat,
    /// `(width, height)` in pixels, when the format header exposes it.
    pub dimensions: Option<(u32, u32)>,
    pub data: Vec<u8>,
}

impl Media for Image {
    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let format = ImageFormat::sniff(data)
            .ok_or_else(|| DecodeError::Media(format!("unrecognized image data ({} bytes)", data.len())))?;
        Ok(Image {
            format,
            dimensions: dimensions(format, data),
            data: data.to_vec(),
        })
    }
}

fn dimensions(format: ImageFormat, data: &[u8]) -> Option<(u32, u32)> {
    match format {
        // Signature, then the IHDR chunk: length, type, width, height.
        ImageFormat::Png if data.len() >= 24 && &data[12..16] == b"IHDR" => {
            let width = u32::from_be_bytes(data[16..20].try_into().ok()?);
            let height = u32::from_be_bytes(data[20..24].try_into().ok()?);
            Some((width, height))
        }
        ImageFormat::Gif if data.len() >= 10 => {
            let width = u16::from_le_bytes([data[6], data[7]]);
            let height = u16::from_le_bytes([data[8], data[9]]);
            Some((u32::from(width), u32::from(height)))
        }
        _ => None,
    }
}
