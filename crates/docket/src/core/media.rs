//! Media type validation for incoming work requests.
//!
//! The vendor accepts a small allow-list of raster image formats plus PDF,
//! with a separate size ceiling per class. Validation runs locally, before
//! any network call, so invalid input never burns vendor quota.

use crate::{DocketError, Result, types::WorkRequest};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";
pub const PNG_MIME_TYPE: &str = "image/png";
pub const BMP_MIME_TYPE: &str = "image/bmp";
pub const GIF_MIME_TYPE: &str = "image/gif";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Default ceiling for raster images: 5 MB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Default ceiling for PDFs: 10 MB.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

static SUPPORTED_MEDIA_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.insert(JPEG_MIME_TYPE);
    set.insert(PNG_MIME_TYPE);
    set.insert(BMP_MIME_TYPE);
    set.insert(GIF_MIME_TYPE);
    set.insert(PDF_MIME_TYPE);
    set
});

static EXT_TO_MEDIA_TYPE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("jpg", JPEG_MIME_TYPE);
    m.insert("jpeg", JPEG_MIME_TYPE);
    m.insert("png", PNG_MIME_TYPE);
    m.insert("bmp", BMP_MIME_TYPE);
    m.insert("gif", GIF_MIME_TYPE);
    m.insert("pdf", PDF_MIME_TYPE);
    m
});

/// Whether a media type is on the vendor allow-list.
pub fn is_supported_media_type(media_type: &str) -> bool {
    SUPPORTED_MEDIA_TYPES.contains(media_type)
}

/// Size ceiling for a supported media type, `None` when unsupported.
pub fn size_ceiling(media_type: &str) -> Option<usize> {
    if media_type == PDF_MIME_TYPE {
        Some(MAX_PDF_BYTES)
    } else if is_supported_media_type(media_type) {
        Some(MAX_IMAGE_BYTES)
    } else {
        None
    }
}

/// Guess the media type of a file by extension.
///
/// Only covers the recognition allow-list; anything else returns `None`.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    EXT_TO_MEDIA_TYPE.get(ext.as_str()).copied()
}

/// Validate a work request against the allow-list and the default size
/// ceilings.
///
/// # Errors
///
/// `DocketError::InvalidInput` for an unsupported media type, an empty
/// payload, or a payload over the type's ceiling.
pub fn validate_work_request(request: &WorkRequest) -> Result<()> {
    validate_work_request_with_ceilings(request, MAX_IMAGE_BYTES, MAX_PDF_BYTES)
}

/// Validate a work request against the allow-list and explicit ceilings.
pub fn validate_work_request_with_ceilings(
    request: &WorkRequest,
    max_image_bytes: usize,
    max_pdf_bytes: usize,
) -> Result<()> {
    if !is_supported_media_type(&request.media_type) {
        return Err(DocketError::invalid_input(format!(
            "unsupported media type: {} (expected JPEG, PNG, BMP, GIF, or PDF)",
            request.media_type
        )));
    }

    if request.payload.is_empty() {
        return Err(DocketError::invalid_input("empty payload"));
    }

    let ceiling = if request.media_type == PDF_MIME_TYPE {
        max_pdf_bytes
    } else {
        max_image_bytes
    };
    if request.size() > ceiling {
        return Err(DocketError::invalid_input(format!(
            "payload of {} bytes exceeds the {} byte ceiling for {}",
            request.size(),
            ceiling,
            request.media_type
        )));
    }

    Ok(())
}
