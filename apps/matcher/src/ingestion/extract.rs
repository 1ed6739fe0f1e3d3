//! Document extraction: raw text from PDF, DOCX and TXT files.
//!
//! Every library fault is reclassified as `InputError::ExtractionFailed`
//! before it leaves this module; the file is read fully into memory so the
//! handle is released before any parsing starts.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::warn;

use crate::errors::InputError;
use crate::ingestion::DocumentFormat;

/// Checks existence, supported extension and non-zero size, in that order.
/// Never touches file contents.
pub fn validate_path(path: &Path) -> Result<DocumentFormat, InputError> {
    if !path.is_file() {
        return Err(InputError::Invalid(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        InputError::Invalid(format!("Unsupported file extension: {ext}"))
    })?;

    let size = fs::metadata(path)
        .map_err(|e| InputError::Invalid(format!("Cannot stat {}: {e}", path.display())))?
        .len();
    if size == 0 {
        return Err(InputError::Invalid("File is empty.".to_string()));
    }

    Ok(format)
}

/// Extracts raw (unsanitized) text. Fails with `InputError::Empty` when the
/// concatenated text is blank.
pub fn extract(path: &Path, format: DocumentFormat) -> Result<String, InputError> {
    let bytes = fs::read(path)
        .map_err(|e| InputError::Unreadable(format!("Cannot read {}: {e}", path.display())))?;

    let text = match format {
        DocumentFormat::Pdf => extract_pdf(&bytes)?,
        DocumentFormat::Docx => extract_docx(&bytes)?,
        DocumentFormat::Txt => decode_txt(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(InputError::Empty(format!(
            "{format} file contains no extractable text"
        )));
    }
    Ok(text)
}

/// Page texts joined by newline, in page order. Blank pages contribute "".
fn extract_pdf(bytes: &[u8]) -> Result<String, InputError> {
    // pdf-extract panics on some malformed inputs
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    let pages = match outcome {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(extraction_failed(DocumentFormat::Pdf, e.to_string())),
        Err(payload) => {
            return Err(extraction_failed(
                DocumentFormat::Pdf,
                panic_message(payload.as_ref()),
            ))
        }
    };
    Ok(pages.join("\n"))
}

/// Paragraph texts joined by newline, in document order.
fn extract_docx(bytes: &[u8]) -> Result<String, InputError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| extraction_failed(DocumentFormat::Docx, format!("{e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Runs inside one paragraph belong to the same sentence, so they are
/// concatenated without a separator. Hyperlinks and tracked insertions
/// carry their own runs; deleted text is skipped.
fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_paragraph_children(&para.children, &mut out);
    out
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        push_run(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

fn decode_txt(bytes: Vec<u8>) -> Result<String, InputError> {
    let text = String::from_utf8(bytes)
        .map_err(|e| InputError::Unreadable(format!("TXT file is not valid UTF-8: {e}")))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn extraction_failed(format: DocumentFormat, cause: String) -> InputError {
    warn!("Failed to extract text from {format}: {cause}");
    InputError::ExtractionFailed {
        format: format.label().to_string(),
        cause,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser panicked".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    use docx_rs::{BreakType, Docx, Hyperlink, HyperlinkType};
    use tempfile::Builder;

    /// Writes a DOCX with one paragraph per entry.
    pub(crate) fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let file = fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    /// Builds a single-page PDF showing `text` in Helvetica.
    pub(crate) fn minimal_pdf(text: &str) -> Vec<u8> {
        pdf_with_pages(&[text])
    }

    /// Builds a PDF with one page per entry, with a correct xref table.
    /// An empty entry gives a page with an empty content stream.
    pub(crate) fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        // 1: catalog, 2: page tree, 3: font, then a page and its content per entry
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 4 + 2 * i))
            .collect();
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (i, text) in pages.iter().enumerate() {
            let stream = if text.is_empty() {
                String::new()
            } else {
                format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET")
            };
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{stream}\nendstream",
                stream.len()
            ));
        }

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for off in offsets {
            out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    fn fixture(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate_path(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, InputError::Invalid(msg) if msg.starts_with("File does not exist")));
    }

    #[test]
    fn test_validate_uppercase_extension() {
        let file = fixture(".TXT", b"hello");
        assert_eq!(validate_path(file.path()), Ok(DocumentFormat::Txt));
    }

    #[test]
    fn test_validate_rejects_unsupported_before_reading() {
        let file = fixture(".rtf", b"");
        assert_eq!(
            validate_path(file.path()),
            Err(InputError::Invalid("Unsupported file extension: .rtf".to_string()))
        );
    }

    #[test]
    fn test_txt_invalid_utf8_is_unreadable() {
        let file = fixture(".txt", &[0xff, 0xfe, 0x00, 0xd8]);
        let err = extract(file.path(), DocumentFormat::Txt).unwrap_err();
        assert!(matches!(err, InputError::Unreadable(_)));
    }

    #[test]
    fn test_txt_whitespace_only_is_empty() {
        let file = fixture(".txt", b"  \n\t \n");
        assert_eq!(
            extract(file.path(), DocumentFormat::Txt),
            Err(InputError::Empty("TXT file contains no extractable text".to_string()))
        );
    }

    #[test]
    fn test_txt_strips_byte_order_mark() {
        let file = fixture(".txt", "\u{feff}Rust".as_bytes());
        assert_eq!(extract(file.path(), DocumentFormat::Txt).unwrap(), "Rust");
    }

    #[test]
    fn test_docx_paragraphs_joined_by_newline() {
        let file = Builder::new().suffix(".docx").tempfile().unwrap();
        write_docx(file.path(), &["First", "", "Third"]);
        let text = extract(file.path(), DocumentFormat::Docx).unwrap();
        assert_eq!(text, "First\n\nThird");
    }

    #[test]
    fn test_docx_without_text_is_empty() {
        let file = Builder::new().suffix(".docx").tempfile().unwrap();
        write_docx(file.path(), &["", "   "]);
        assert_eq!(
            extract(file.path(), DocumentFormat::Docx),
            Err(InputError::Empty("DOCX file contains no extractable text".to_string()))
        );
    }

    #[test]
    fn test_docx_hyperlinks_and_breaks_kept() {
        let file = Builder::new().suffix(".docx").tempfile().unwrap();
        let docx = Docx::new()
            .add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text("Senior Engineer")
                        .add_break(BreakType::TextWrapping)
                        .add_text("Acme Corp"),
                ),
            )
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Portfolio: "))
                    .add_hyperlink(
                        Hyperlink::new("portfolio", HyperlinkType::Anchor)
                            .add_run(Run::new().add_text("github.com/jane")),
                    ),
            );
        docx.build()
            .pack(fs::File::create(file.path()).unwrap())
            .unwrap();

        let text = extract(file.path(), DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Senior Engineer\nAcme Corp\nPortfolio: github.com/jane");
    }

    #[test]
    fn test_corrupt_docx_is_extraction_failure() {
        let file = fixture(".docx", b"this is not a zip archive");
        let err = extract(file.path(), DocumentFormat::Docx).unwrap_err();
        assert!(matches!(err, InputError::ExtractionFailed { format, .. } if format == "DOCX"));
    }

    #[test]
    fn test_pdf_text_extracted() {
        let file = fixture(".pdf", &minimal_pdf("Requires Rust"));
        let text = extract(file.path(), DocumentFormat::Pdf).unwrap();
        assert!(text.contains("Requires"));
        assert!(text.contains("Rust"));
    }

    #[test]
    fn test_pdf_pages_joined_in_order() {
        let file = fixture(".pdf", &pdf_with_pages(&["Alpha", "", "Omega"]));
        let text = extract(file.path(), DocumentFormat::Pdf).unwrap();
        let alpha = text.find("Alpha").unwrap();
        let omega = text.find("Omega").unwrap();
        assert!(alpha < omega);
        assert!(text[alpha..omega].contains('\n'));
    }

    #[test]
    fn test_pdf_with_only_blank_pages_is_empty() {
        let file = fixture(".pdf", &pdf_with_pages(&["", ""]));
        assert_eq!(
            extract(file.path(), DocumentFormat::Pdf),
            Err(InputError::Empty("PDF file contains no extractable text".to_string()))
        );
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_failure() {
        let file = fixture(".pdf", b"%PDF-1.4\nnot really a pdf");
        let err = extract(file.path(), DocumentFormat::Pdf).unwrap_err();
        assert!(matches!(err, InputError::ExtractionFailed { format, .. } if format == "PDF"));
    }
}
