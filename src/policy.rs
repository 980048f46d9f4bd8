//! Upload acceptance rules applied before a file can enter a selection.

use serde::Serialize;
use thiserror::Error;

use crate::error::ExplainError;
use crate::intake::UploadedFile;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Media-type patterns mapped to the file extensions they allow.
///
/// A file passes when its media type matches any pattern (`image/*` style
/// wildcards included) or its extension matches any listed extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptMap(Vec<(String, Vec<String>)>);

impl AcceptMap {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(pattern, exts)| {
                let exts = exts
                    .into_iter()
                    .map(|ext| {
                        let ext = ext.to_ascii_lowercase();
                        if ext.starts_with('.') {
                            ext
                        } else {
                            format!(".{ext}")
                        }
                    })
                    .collect();
                (pattern.to_ascii_lowercase(), exts)
            })
            .collect();
        Self(entries)
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.0
    }

    pub fn accepts(&self, name: &str, media_type: &str) -> bool {
        let media_type = media_type.to_ascii_lowercase();
        let extension = extension_of(name);
        self.0.iter().any(|(pattern, exts)| {
            pattern_matches(pattern, &media_type)
                || extension
                    .as_deref()
                    .is_some_and(|ext| exts.iter().any(|allowed| allowed == ext))
        })
    }
}

impl Default for AcceptMap {
    fn default() -> Self {
        Self::new(vec![
            (
                "image/*".to_string(),
                [".png", ".jpg", ".jpeg", ".gif", ".webp"]
                    .map(String::from)
                    .to_vec(),
            ),
            ("application/pdf".to_string(), vec![".pdf".to_string()]),
        ])
    }
}

fn pattern_matches(pattern: &str, media_type: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(prefix) => media_type
            .split_once('/')
            .is_some_and(|(kind, _)| kind == prefix),
        None => pattern == media_type,
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Why a candidate file never reached the selection.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    #[error("file type {media_type} is not accepted")]
    UnsupportedType { media_type: String },

    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("file is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadPolicy {
    pub accept: AcceptMap,
    pub max_files: usize,
    pub max_size_mb: usize,
    pub submission_limit_mb: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accept: AcceptMap::default(),
            max_files: 1,
            max_size_mb: 20,
            submission_limit_mb: 5,
        }
    }
}

impl UploadPolicy {
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn submission_limit_bytes(&self) -> usize {
        self.submission_limit_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Files accepted at intake may still be refused at submission time.
    pub fn intake_exceeds_submission(&self) -> bool {
        self.max_size_mb > self.submission_limit_mb
    }

    pub fn check(&self, name: &str, media_type: &str, size: usize) -> Result<(), Rejection> {
        if size == 0 {
            return Err(Rejection::Empty);
        }
        if !self.accept.accepts(name, media_type) {
            return Err(Rejection::UnsupportedType {
                media_type: media_type.to_string(),
            });
        }
        let limit = self.max_size_bytes();
        if size > limit {
            return Err(Rejection::TooLarge { size, limit });
        }
        Ok(())
    }

    pub fn check_submission(&self, file: &UploadedFile) -> Result<(), ExplainError> {
        let limit = self.submission_limit_bytes();
        let size = file.bytes.len();
        if size > limit {
            return Err(ExplainError::SubmissionTooLarge { size, limit });
        }
        Ok(())
    }
}

/// True for a bare `type/subtype` made of RFC 6838 restricted-name characters.
pub fn is_valid_media_type(media_type: &str) -> bool {
    fn is_token(part: &str) -> bool {
        !part.is_empty()
            && part.len() <= 127
            && part.bytes().all(|b| {
                b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b)
            })
    }
    media_type
        .split_once('/')
        .is_some_and(|(kind, subtype)| is_token(kind) && is_token(subtype))
}

/// Declared media type, or a guess from the file name when the client sent
/// nothing useful or something malformed. Parameters are dropped.
pub fn resolve_media_type(name: &str, declared: Option<&str>) -> String {
    let declared = declared.map(|value| value.split(';').next().unwrap_or_default().trim());
    match declared {
        Some(declared)
            if is_valid_media_type(declared) && declared != "application/octet-stream" =>
        {
            declared.to_ascii_lowercase()
        }
        _ => mime_guess::from_path(name)
            .first_or_octet_stream()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn default_accepts_images_and_pdf() {
        let policy = UploadPolicy::default();
        assert!(policy.check("cat.jpg", "image/jpeg", 10).is_ok());
        assert!(policy.check("scan.PDF", "application/pdf", 10).is_ok());
        assert!(policy.check("anim.bmp", "image/bmp", 10).is_ok());
    }

    #[test]
    fn extension_alone_is_enough() {
        let accept = AcceptMap::default();
        assert!(accept.accepts("photo.WEBP", "application/octet-stream"));
        assert!(!accept.accepts("notes.txt", "text/plain"));
    }

    #[test]
    fn rejects_unsupported_type() {
        let policy = UploadPolicy::default();
        assert_eq!(
            policy.check("notes.txt", "text/plain", 10),
            Err(Rejection::UnsupportedType {
                media_type: "text/plain".to_string()
            })
        );
    }

    #[test]
    fn rejects_oversized_and_empty() {
        let policy = UploadPolicy {
            max_size_mb: 1,
            ..UploadPolicy::default()
        };
        let limit = 1024 * 1024;
        assert_eq!(
            policy.check("big.png", "image/png", limit + 1),
            Err(Rejection::TooLarge {
                size: limit + 1,
                limit
            })
        );
        assert!(policy.check("edge.png", "image/png", limit).is_ok());
        assert_eq!(policy.check("none.png", "image/png", 0), Err(Rejection::Empty));
    }

    #[test]
    fn submission_limit_is_separate_from_intake_limit() {
        let policy = UploadPolicy {
            max_size_mb: 20,
            submission_limit_mb: 1,
            ..UploadPolicy::default()
        };
        assert!(policy.intake_exceeds_submission());

        let file = UploadedFile {
            name: "large.pdf".to_string(),
            media_type: "application/pdf".to_string(),
            bytes: Bytes::from(vec![0u8; 1024 * 1024 + 1]),
        };
        assert!(policy.check("large.pdf", "application/pdf", file.bytes.len()).is_ok());
        assert!(matches!(
            policy.check_submission(&file),
            Err(ExplainError::SubmissionTooLarge { .. })
        ));
    }

    #[test]
    fn malformed_declared_type_is_replaced_by_guess() {
        assert_eq!(
            resolve_media_type("a.png", Some("image/x\" onerror=\"alert(1)")),
            "image/png"
        );
        assert_eq!(
            resolve_media_type("a.pdf", Some("application/pdf; name=a.pdf")),
            "application/pdf"
        );
        assert!(!is_valid_media_type("image/x\" onerror=\"alert(1)"));
        assert!(!is_valid_media_type("image"));
        assert!(is_valid_media_type("image/svg+xml"));
    }

    #[test]
    fn media_type_falls_back_to_guess() {
        assert_eq!(resolve_media_type("a.png", Some("image/png")), "image/png");
        assert_eq!(resolve_media_type("a.pdf", None), "application/pdf");
        assert_eq!(
            resolve_media_type("a.jpg", Some("application/octet-stream")),
            "image/jpeg"
        );
        assert_eq!(
            resolve_media_type("mystery", None),
            "application/octet-stream"
        );
    }
}
