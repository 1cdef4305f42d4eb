//! Text extraction from uploaded bytes

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use pulldown_cmark::{html, Parser};
use regex::Regex;

/// Turns one uploaded file into plain text. Implementations are blocking
/// and may be slow; callers run them off the async executor.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ScreenerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", filename, e))
        })
    }
}

pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ScreenerError::TextProcessing(format!("'{}' is not valid UTF-8: {}", filename, e))
        })
    }
}

pub struct MarkdownExtractor {
    tag_regex: Regex,
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self {
            tag_regex: Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"),
        }
    }

    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        self.tag_regex
            .replace_all(&text, "")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DocumentExtractor for MarkdownExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let markdown = PlainTextExtractor.extract(filename, bytes)?;

        let mut html_output = String::new();
        html::push_html(&mut html_output, Parser::new(&markdown));

        Ok(self.html_to_text(&html_output))
    }
}

/// Routes an upload to the extractor for its file type.
#[derive(Default)]
pub struct UploadExtractor {
    markdown: MarkdownExtractor,
}

impl UploadExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentExtractor for UploadExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        match FileType::from_path(filename) {
            FileType::Pdf => PdfExtractor.extract(filename, bytes),
            FileType::Text => PlainTextExtractor.extract(filename, bytes),
            FileType::Markdown => self.markdown.extract(filename, bytes),
            FileType::Unknown => Err(ScreenerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                filename
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_is_flattened_to_text() {
        let markdown = b"# Jane Doe\n\n**Python** & SQL\n\n- Docker\n- Kubernetes\n";

        let text = UploadExtractor::new().extract("jane.md", markdown).unwrap();

        assert_eq!(text, "Jane Doe\nPython & SQL\nDocker\nKubernetes");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = UploadExtractor::new().extract("cv.txt", "Résumé\nRust".as_bytes()).unwrap();
        assert_eq!(text, "Résumé\nRust");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        assert!(PlainTextExtractor.extract("cv.txt", &[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let result = std::panic::catch_unwind(|| PdfExtractor.extract("broken.pdf", b"not a pdf at all"));
        assert!(!matches!(result, Ok(Ok(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = UploadExtractor::new().extract("cv.docx", b"PK");
        assert!(matches!(result, Err(ScreenerError::UnsupportedFormat(_))));
    }
}
