//! Helpers for naming and typing uploaded photos, shared by the server and the submit client.

use axum::extract::multipart::Field;

use crate::core::error::AppError;
use crate::shared::constants::MAX_IMAGE_SIZE;
use crate::shared::validation::FILE_EXTENSION_REGEX;

/// Generic type used when a file extension is missing or unrecognised
pub const GENERIC_IMAGE_TYPE: &str = "image";

/// Photo bytes received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Infer an image MIME type from a file name's extension.
pub fn infer_image_mime(file_name: &str) -> String {
    let Some(captures) = FILE_EXTENSION_REGEX.captures(file_name) else {
        return GENERIC_IMAGE_TYPE.to_string();
    };

    let mime = match captures[1].to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => GENERIC_IMAGE_TYPE,
    };
    mime.to_string()
}

/// Reduce a client-supplied file name to a single safe object-key segment.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Read one multipart file part, enforcing the per-image size limit.
///
/// The declared content type wins; otherwise it is inferred from the file name.
pub async fn read_image_field(field: Field<'_>) -> Result<UploadedImage, AppError> {
    let file_name = field
        .file_name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| GENERIC_IMAGE_TYPE.to_string());

    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| infer_image_mime(&file_name));
    let content_type = if content_type.contains('/') {
        content_type
    } else {
        "application/octet-stream".to_string()
    };

    let data = field.bytes().await.map_err(|e| {
        tracing::debug!("Failed to read image bytes: {}", e);
        AppError::BadRequest(format!("Failed to read image data: {}", e))
    })?;

    if data.len() > MAX_IMAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "Image '{}' is too large. Maximum size is {} MB",
            file_name,
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }

    Ok(UploadedImage {
        file_name,
        content_type,
        data: data.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_image_mime_known_extensions() {
        assert_eq!(infer_image_mime("pothole.jpg"), "image/jpeg");
        assert_eq!(infer_image_mime("pothole.JPEG"), "image/jpeg");
        assert_eq!(infer_image_mime("scan.png"), "image/png");
        assert_eq!(infer_image_mime("IMG_0042.HEIC"), "image/heic");
    }

    #[test]
    fn test_infer_image_mime_falls_back_to_generic() {
        assert_eq!(infer_image_mime("capture"), GENERIC_IMAGE_TYPE);
        assert_eq!(infer_image_mime("notes.txt"), GENERIC_IMAGE_TYPE);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\road.png"), "road.png");
        assert_eq!(sanitize_file_name("my road.png"), "my road.png");
        assert_eq!(sanitize_file_name(""), "image");
        assert_eq!(sanitize_file_name("dir/"), "image");
    }
}
