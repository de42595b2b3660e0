use tubely_core::models::MediaKind;
use tubely_core::AppError;

/// Content type validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid content type: {content_type:?} (allowed: {allowed:?})")]
    InvalidMediaType {
        content_type: Option<String>,
        allowed: Vec<&'static str>,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidMediaType { allowed, .. } => AppError::BadRequest(format!(
                "Invalid file type, expected one of: {}",
                allowed.join(", ")
            )),
        }
    }
}

/// Checks a declared content type against a fixed allow-list.
///
/// Parameters after `;` are ignored and matching is case-insensitive. The bytes
/// themselves are never inspected.
#[derive(Debug, Clone, Copy)]
pub struct MediaTypeValidator {
    allowed: &'static [MediaKind],
}

impl MediaTypeValidator {
    pub fn thumbnail() -> Self {
        Self {
            allowed: &[MediaKind::Jpeg, MediaKind::Png],
        }
    }

    pub fn video() -> Self {
        Self {
            allowed: &[MediaKind::Mp4],
        }
    }

    pub fn validate(&self, content_type: Option<&str>) -> Result<MediaKind, ValidationError> {
        content_type
            .and_then(parse_essence)
            .and_then(|essence| MediaKind::from_essence(&essence))
            .filter(|kind| self.allowed.contains(kind))
            .ok_or_else(|| ValidationError::InvalidMediaType {
                content_type: content_type.map(String::from),
                allowed: self.allowed.iter().map(|k| k.content_type()).collect(),
            })
    }
}

/// `type/subtype` of a MIME value, lowercased, or `None` if it's malformed.
fn parse_essence(raw: &str) -> Option<String> {
    let essence = raw.split(';').next()?.trim();
    let (kind, subtype) = essence.split_once('/')?;

    if kind.is_empty()
        || subtype.is_empty()
        || subtype.contains('/')
        || essence.chars().any(char::is_whitespace)
    {
        return None;
    }

    Some(essence.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_accepts_jpeg_and_png() {
        let validator = MediaTypeValidator::thumbnail();
        assert_eq!(validator.validate(Some("image/jpeg")).unwrap(), MediaKind::Jpeg);
        assert_eq!(validator.validate(Some("image/png")).unwrap(), MediaKind::Png);
    }

    #[test]
    fn test_parameters_and_case_are_ignored() {
        let validator = MediaTypeValidator::thumbnail();
        assert_eq!(
            validator.validate(Some("Image/PNG; charset=binary")).unwrap(),
            MediaKind::Png
        );

        let validator = MediaTypeValidator::video();
        assert_eq!(
            validator.validate(Some(" video/mp4 ;codecs=avc1")).unwrap(),
            MediaKind::Mp4
        );
    }

    #[test]
    fn test_thumbnail_rejects_other_types() {
        let validator = MediaTypeValidator::thumbnail();
        for ct in ["image/gif", "text/plain", "video/mp4", "image/webp"] {
            assert!(validator.validate(Some(ct)).is_err(), "{ct} should be rejected");
        }
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        let validator = MediaTypeValidator::thumbnail();
        for ct in ["", "image", "/png", "image/", "image /png", "image/png/extra"] {
            assert!(validator.validate(Some(ct)).is_err(), "{ct:?} should be rejected");
        }
        assert!(validator.validate(None).is_err());
    }

    #[test]
    fn test_video_accepts_only_mp4() {
        let validator = MediaTypeValidator::video();
        assert!(validator.validate(Some("video/webm")).is_err());
        assert!(validator.validate(Some("image/png")).is_err());
        assert_eq!(validator.validate(Some("video/mp4")).unwrap(), MediaKind::Mp4);
    }

    #[test]
    fn test_rejection_is_bad_request() {
        let err = MediaTypeValidator::video()
            .validate(Some("video/webm"))
            .unwrap_err();
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::BadRequest(ref msg) if msg.contains("video/mp4")));
    }
}
