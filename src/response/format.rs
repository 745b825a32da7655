//! Image format detection and content-type inference

/// MIME type used for anything that is not a recognized image
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a file extension (with or without the leading dot)
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => OCTET_STREAM,
    }
}

/// File extension for an image MIME type
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Detect image format from binary data using magic bytes
pub fn detect_image_format(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("png");
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpg");
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("gif");
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("webp");
    }

    None
}

/// Extension and content type to store a generated image under.
///
/// Magic bytes win over the reported MIME type; JPEG is the last resort.
pub fn storage_format(data: &[u8], reported: Option<&str>) -> (&'static str, &'static str) {
    let extension = detect_image_format(data)
        .or_else(|| reported.and_then(extension_for_content_type))
        .unwrap_or("jpg");
    (extension, content_type_for_extension(extension))
}
