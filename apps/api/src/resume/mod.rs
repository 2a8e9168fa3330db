//! Resume text extraction. Best-effort: any failure yields an empty string.

pub mod handlers;

use bytes::Bytes;
use tracing::{debug, warn};

/// Extracted text is cut to this many characters.
pub const MAX_RESUME_CHARS: usize = 20_000;

/// Upload bodies larger than this are rejected before extraction.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Extracts plain text from PDF bytes on a blocking thread.
///
/// Parser errors, and panics inside the parser, both degrade to `""`.
pub async fn extract_resume_text(data: Bytes) -> String {
    let size = data.len();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(bytes = size, "Resume text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!(bytes = size, "Resume extraction task aborted: {e}");
            String::new()
        }
    };

    let text = truncate_chars(&text, MAX_RESUME_CHARS);
    debug!(bytes = size, chars = text.chars().count(), "Resume text extracted");
    text
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
