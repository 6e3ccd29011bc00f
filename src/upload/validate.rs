use crate::errors::UploadError;

const MIB: u64 = 1024 * 1024;

/// Whether a declared content type is an image type.
pub fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Reject anything that is not an image or is larger than `max_bytes`.
///
/// Runs before any bytes leave the machine and again on the server.
pub fn validate_image(content_type: &str, size: u64, max_bytes: u64) -> Result<(), UploadError> {
    if !is_image_type(content_type) {
        return Err(UploadError::NotAnImage {
            content_type: content_type.to_string(),
        });
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            limit_mib: max_bytes.div_ceil(MIB).max(1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 5 * MIB;

    #[test]
    fn test_accepts_images_under_limit() {
        assert!(validate_image("image/png", MIB, LIMIT).is_ok());
        assert!(validate_image("IMAGE/JPEG", LIMIT, LIMIT).is_ok());
    }

    #[test]
    fn test_rejects_large_png() {
        let err = validate_image("image/png", 10 * 1000 * 1000, LIMIT).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit_mib: 5, .. }));
        assert_eq!(err.to_string(), "Image size should be less than 5MB");
    }

    #[test]
    fn test_rejects_non_images() {
        for ct in ["application/pdf", "text/plain", "", "video/mp4"] {
            let err = validate_image(ct, 10, LIMIT).unwrap_err();
            assert!(matches!(err, UploadError::NotAnImage { .. }), "{}", ct);
        }
    }
}
