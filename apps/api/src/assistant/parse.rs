//! Resume extraction from pasted text or an uploaded image/PDF.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::assistant::prompts::{parse_document_prompt, parse_text_prompt, PARSE_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::{ContentPart, LlmClient};
use crate::models::resume::PartialResume;

const IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];
const PDF_TYPE: &str = "application/pdf";

/// How an uploaded file is attached to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Pdf,
}

impl UploadKind {
    pub fn from_mime(mime_type: &str) -> Result<Self, AppError> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if mime_type == PDF_TYPE {
            Ok(UploadKind::Pdf)
        } else if IMAGE_TYPES.contains(&mime_type.as_str()) {
            Ok(UploadKind::Image)
        } else {
            Err(AppError::Validation(format!(
                "Unsupported file type '{mime_type}': upload a PDF or a PNG, JPEG, GIF or WebP image"
            )))
        }
    }
}

/// Builds the message blocks for a document parse. The payload must be valid base64.
pub fn document_parts(base64_data: &str, mime_type: &str) -> Result<Vec<ContentPart>, AppError> {
    let kind = UploadKind::from_mime(mime_type)?;
    let data = base64_data.trim();
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    STANDARD
        .decode(data)
        .map_err(|e| AppError::Validation(format!("File payload is not valid base64: {e}")))?;

    let attachment = match kind {
        UploadKind::Image => ContentPart::image(mime_type.trim().to_ascii_lowercase(), data),
        UploadKind::Pdf => ContentPart::pdf(data),
    };
    Ok(vec![attachment, ContentPart::text(parse_document_prompt())])
}

/// Extracts a partial resume from free text.
pub async fn parse_free_text(text: &str, llm: &LlmClient) -> Result<PartialResume, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let parts = [ContentPart::text(parse_text_prompt(text))];
    Ok(llm.call_json::<PartialResume>(&parts, PARSE_SYSTEM).await?)
}

/// Extracts a partial resume from a base64 image or PDF.
pub async fn parse_document(
    base64_data: &str,
    mime_type: &str,
    llm: &LlmClient,
) -> Result<PartialResume, AppError> {
    let parts = document_parts(base64_data, mime_type)?;
    Ok(llm.call_json::<PartialResume>(&parts, PARSE_SYSTEM).await?)
}

/// Encodes raw upload bytes for the document parser.
pub fn encode_upload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;

    #[test]
    fn test_mime_dispatch() {
        assert_eq!(UploadKind::from_mime("application/pdf").unwrap(), UploadKind::Pdf);
        assert_eq!(UploadKind::from_mime("IMAGE/PNG").unwrap(), UploadKind::Image);
        assert!(matches!(
            UploadKind::from_mime("text/plain"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_pdf_is_sent_as_document_block() {
        let parts = document_parts(&encode_upload(b"%PDF-1.7"), "application/pdf").unwrap();
        assert!(matches!(parts[0], ContentPart::Document { .. }));
        let ContentPart::Text { text } = &parts[1] else {
            panic!("expected prompt text block");
        };
        assert!(text.contains(NO_INVENTION_INSTRUCTION));
    }

    #[test]
    fn test_image_keeps_media_type() {
        let parts = document_parts(&encode_upload(&[0x89, 0x50]), "image/jpeg").unwrap();
        let ContentPart::Image { source } = &parts[0] else {
            panic!("expected image block");
        };
        assert_eq!(source.media_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(document_parts("", "image/png").is_err());
        assert!(document_parts("not base64!!", "image/png").is_err());
    }
}
