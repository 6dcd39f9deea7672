//! Image transport encoding: data-URL codec and upload validation.
//!
//! Browsers submit images as `data:<mime>;base64,<payload>` strings. This
//! module decodes them into raw bytes, re-encodes for responses, and
//! enforces the upload constraints before anything touches the network.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Maximum size of a single uploaded image (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum number of images accepted per generation job.
pub const MAX_IMAGES_PER_JOB: usize = 10;

/// A decoded upload: raw bytes plus the content type declared in the
/// data-URL header. Transient -- lives only for one job's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Decode a `data:<mime>;base64,<payload>` string.
///
/// Fails with [`CoreError::Encoding`] on a missing `data:` scheme, a
/// header without the `;base64` marker, or an undecodable payload.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage, CoreError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Encoding("data URL must start with 'data:'".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Encoding("data URL is missing the ',' separator".to_string()))?;

    let content_type = header.strip_suffix(";base64").ok_or_else(|| {
        CoreError::Encoding("data URL header is missing the ';base64' marker".to_string())
    })?;

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| CoreError::Encoding(format!("invalid base64 payload: {e}")))?;

    Ok(DecodedImage {
        bytes,
        content_type: content_type.to_string(),
    })
}

/// Encode raw bytes back into a data URL with the given content type.
pub fn encode_data_url(bytes: &[u8], content_type: &str) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Enforce the upload constraints: size cap and an `image/` content type.
///
/// Must be called before any remote call is made; a rejected image never
/// reaches storage or the generation service.
pub fn validate_image(image: &DecodedImage) -> Result<(), CoreError> {
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "image is {} bytes; the limit is {} bytes",
            image.bytes.len(),
            MAX_IMAGE_BYTES
        )));
    }
    if !image.content_type.starts_with("image/") {
        return Err(CoreError::Validation(format!(
            "unsupported content type '{}'; only image/* uploads are accepted",
            image.content_type
        )));
    }
    Ok(())
}

/// Best-effort dimension probe from the image header. Returns `None` for
/// formats the `image` crate cannot identify; used for diagnostics only.
pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trips_bytes_exactly() {
        let original: Vec<u8> = (0u8..=255).collect();
        let url = encode_data_url(&original, "image/jpeg");
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.bytes, original);
        assert_eq!(decoded.content_type, "image/jpeg");
    }

    #[test]
    fn decode_rejects_missing_scheme() {
        let err = decode_data_url("image/jpeg;base64,AAAA").unwrap_err();
        assert!(matches!(err, CoreError::Encoding(_)));
    }

    #[test]
    fn decode_rejects_header_without_base64_marker() {
        let err = decode_data_url("data:image/jpeg,AAAA").unwrap_err();
        assert!(matches!(err, CoreError::Encoding(_)));
    }

    #[test]
    fn decode_rejects_invalid_base64_payload() {
        let err = decode_data_url("data:image/jpeg;base64,!!not-base64!!").unwrap_err();
        assert!(matches!(err, CoreError::Encoding(_)));
    }

    #[test]
    fn validate_accepts_a_small_jpeg() {
        let img = DecodedImage {
            bytes: vec![0xFF, 0xD8, 0xFF],
            content_type: "image/jpeg".to_string(),
        };
        assert!(validate_image(&img).is_ok());
    }

    #[test]
    fn validate_rejects_oversized_image() {
        let img = DecodedImage {
            bytes: vec![0u8; MAX_IMAGE_BYTES + 1],
            content_type: "image/jpeg".to_string(),
        };
        let err = validate_image(&img).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn validate_rejects_non_image_content_type() {
        let img = DecodedImage {
            bytes: vec![1, 2, 3],
            content_type: "application/pdf".to_string(),
        };
        let err = validate_image(&img).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn probe_reads_png_dimensions() {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(2, 3)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        assert_eq!(probe_dimensions(buf.get_ref()), Some((2, 3)));
    }

    #[test]
    fn probe_returns_none_for_garbage() {
        assert_eq!(probe_dimensions(b"not an image"), None);
    }
}
