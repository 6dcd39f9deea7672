//! Archive builder: bundles decoded uploads into a single zip.
//!
//! The generation service accepts one archive reference per job, so all
//! source images are packed into one deflate-compressed zip with
//! deterministic entry names (`image_1.jpg`, `image_2.jpg`, ...) in input
//! order.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::encoding::DecodedImage;
use crate::error::CoreError;

/// Content type of the produced archive.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// A built archive ready for upload.
#[derive(Debug, Clone)]
pub struct ImageArchive {
    pub bytes: Vec<u8>,
}

impl ImageArchive {
    /// Content length of the archive in bytes.
    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }
}

/// Entry name for the image at `index` (1-based in the archive).
pub fn entry_name(index: usize) -> String {
    format!("image_{}.jpg", index + 1)
}

/// Pack images into a single deflate-compressed zip, preserving input order.
pub fn build_archive(images: &[DecodedImage]) -> Result<ImageArchive, CoreError> {
    if images.is_empty() {
        return Err(CoreError::Validation(
            "at least one image is required to build an archive".to_string(),
        ));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, image) in images.iter().enumerate() {
        writer
            .start_file(entry_name(index), options)
            .map_err(|e| CoreError::Internal(format!("failed to start archive entry: {e}")))?;
        writer
            .write_all(&image.bytes)
            .map_err(|e| CoreError::Internal(format!("failed to write archive entry: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| CoreError::Internal(format!("failed to finalize archive: {e}")))?;

    Ok(ImageArchive {
        bytes: cursor.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn jpeg(bytes: &[u8]) -> DecodedImage {
        DecodedImage {
            bytes: bytes.to_vec(),
            content_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = build_archive(&[]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn entry_names_are_one_based() {
        assert_eq!(entry_name(0), "image_1.jpg");
        assert_eq!(entry_name(2), "image_3.jpg");
    }

    #[test]
    fn archive_preserves_entry_order_and_content() {
        let images = vec![jpeg(b"first image"), jpeg(b"second image")];
        let archive = build_archive(&images).unwrap();
        assert!(archive.content_length() > 0);

        let mut reader = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        assert_eq!(reader.len(), 2);

        for (index, expected) in [b"first image".as_slice(), b"second image".as_slice()]
            .iter()
            .enumerate()
        {
            let mut entry = reader.by_index(index).unwrap();
            assert_eq!(entry.name(), entry_name(index));
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            assert_eq!(&content, expected);
        }
    }
}
