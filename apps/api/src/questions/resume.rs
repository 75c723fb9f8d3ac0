//! Resume transport encoding: `data:<mime>;base64,<payload>`.
//!
//! The resume is opaque here. Its bytes are never parsed, only checked for
//! type and size and carried to the model as an inline attachment.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ACCEPTED_MIME_TYPES: [&str; 3] = [MIME_PDF, MIME_DOC, MIME_DOCX];

/// 5 MiB, measured on the decoded bytes.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResumeError {
    #[error("resume required")]
    Missing,

    #[error("resume must be a base64 data URI (data:<mime>;base64,<payload>)")]
    NotADataUri,

    #[error("resume payload is not valid base64")]
    InvalidBase64,

    #[error("resume file is empty")]
    Empty,

    #[error("unsupported resume type '{0}': .pdf and .doc/.docx files are accepted")]
    UnsupportedType(String),

    #[error("resume exceeds the 5MB size limit ({0} bytes)")]
    TooLarge(usize),
}

/// A validated, self-describing encoded resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeBlob {
    mime_type: String,
    encoded: String,
    decoded_len: usize,
}

impl ResumeBlob {
    /// Parses and validates a data URI.
    pub fn parse(data_uri: &str) -> Result<Self, ResumeError> {
        let data_uri = data_uri.trim();
        if data_uri.is_empty() {
            return Err(ResumeError::Missing);
        }

        let rest = data_uri
            .strip_prefix("data:")
            .ok_or(ResumeError::NotADataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ResumeError::NotADataUri)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(ResumeError::NotADataUri)?;

        // Browsers may append parameters (`;name=cv.pdf`) before `;base64`.
        let mime_type = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if mime_type.is_empty() {
            return Err(ResumeError::NotADataUri);
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| ResumeError::InvalidBase64)?;

        Self::check(&mime_type, bytes.len())?;

        Ok(Self {
            mime_type,
            encoded: payload.to_string(),
            decoded_len: bytes.len(),
        })
    }

    /// Encodes raw file bytes, e.g. from a multipart upload.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, ResumeError> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        Self::check(&mime_type, bytes.len())?;

        Ok(Self {
            mime_type,
            encoded: STANDARD.encode(bytes),
            decoded_len: bytes.len(),
        })
    }

    fn check(mime_type: &str, len: usize) -> Result<(), ResumeError> {
        if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
            return Err(ResumeError::UnsupportedType(mime_type.to_string()));
        }
        if len == 0 {
            return Err(ResumeError::Empty);
        }
        if len > MAX_RESUME_BYTES {
            return Err(ResumeError::TooLarge(len));
        }
        Ok(())
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload, exactly as received or encoded.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded)
    }

    #[cfg(test)]
    pub fn decode(&self) -> Result<Vec<u8>, ResumeError> {
        STANDARD
            .decode(&self.encoded)
            .map_err(|_| ResumeError::InvalidBase64)
    }
}

/// Maps a file extension to its accepted MIME type. Used when an upload
/// arrives without a usable content type.
pub fn mime_type_for_filename(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some(MIME_PDF),
        "doc" => Some(MIME_DOC),
        "docx" => Some(MIME_DOCX),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

    #[test]
    fn test_from_bytes_round_trips_through_data_uri() {
        let blob = ResumeBlob::from_bytes(MIME_PDF, PDF_BYTES).unwrap();
        let uri = blob.to_data_uri();
        assert!(uri.starts_with("data:application/pdf;base64,"));

        let parsed = ResumeBlob::parse(&uri).unwrap();
        assert_eq!(parsed, blob);
        assert_eq!(parsed.decode().unwrap(), PDF_BYTES);
        assert_eq!(parsed.mime_type(), MIME_PDF);
        assert_eq!(parsed.decoded_len(), PDF_BYTES.len());
    }

    #[test]
    fn test_parse_strips_mime_parameters() {
        let uri = format!(
            "data:{MIME_DOCX};name=cv.docx;base64,{}",
            STANDARD.encode(b"PK\x03\x04")
        );
        let blob = ResumeBlob::parse(&uri).unwrap();
        assert_eq!(blob.mime_type(), MIME_DOCX);
    }

    #[test]
    fn test_parse_empty_is_missing() {
        assert_eq!(ResumeBlob::parse("   "), Err(ResumeError::Missing));
    }

    #[test]
    fn test_parse_rejects_non_data_uri() {
        assert_eq!(
            ResumeBlob::parse("https://example.com/cv.pdf"),
            Err(ResumeError::NotADataUri)
        );
        assert_eq!(
            ResumeBlob::parse("data:application/pdf,plain"),
            Err(ResumeError::NotADataUri)
        );
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        assert_eq!(
            ResumeBlob::parse("data:application/pdf;base64,@@@"),
            Err(ResumeError::InvalidBase64)
        );
    }

    #[test]
    fn test_parse_rejects_empty_payload() {
        assert_eq!(
            ResumeBlob::parse("data:application/pdf;base64,"),
            Err(ResumeError::Empty)
        );
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = ResumeBlob::from_bytes("image/png", b"\x89PNG").unwrap_err();
        assert_eq!(err, ResumeError::UnsupportedType("image/png".into()));
    }

    #[test]
    fn test_rejects_oversized() {
        let bytes = vec![0u8; MAX_RESUME_BYTES + 1];
        assert_eq!(
            ResumeBlob::from_bytes(MIME_PDF, &bytes),
            Err(ResumeError::TooLarge(MAX_RESUME_BYTES + 1))
        );
    }

    #[test]
    fn test_accepts_exactly_max_size() {
        let bytes = vec![0u8; MAX_RESUME_BYTES];
        assert!(ResumeBlob::from_bytes(MIME_PDF, &bytes).is_ok());
    }

    #[test]
    fn test_mime_type_for_filename() {
        assert_eq!(mime_type_for_filename("Resume.PDF"), Some(MIME_PDF));
        assert_eq!(mime_type_for_filename("cv.doc"), Some(MIME_DOC));
        assert_eq!(mime_type_for_filename("cv.final.docx"), Some(MIME_DOCX));
        assert_eq!(mime_type_for_filename("cv.txt"), None);
        assert_eq!(mime_type_for_filename("resume"), None);
    }
}
