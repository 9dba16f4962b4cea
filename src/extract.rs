//! Text extraction from uploaded documents (plain text, PDF, DOCX).
//!
//! `extract` never fails: when a document cannot be read, the returned text IS
//! the error description. Callers detect unusable results with the
//! minimum-length check. `try_extract` exposes the typed error for callers
//! that want it.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
  PlainText,
  Pdf,
  Docx,
}

impl DocumentFormat {
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext.to_ascii_lowercase().as_str() {
      "txt" => Some(Self::PlainText),
      "pdf" => Some(Self::Pdf),
      "docx" => Some(Self::Docx),
      _ => None,
    }
  }
}

#[derive(Debug, Error)]
pub enum ExtractError {
  #[error("Error decoding text file: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),

  #[error("Error extracting text from PDF: {0}")]
  Pdf(String),

  #[error("Error extracting text from DOCX: {0}")]
  Docx(String),

  #[error("Error reading uploaded file: {0}")]
  Io(#[from] std::io::Error),
}

/// Best-effort extraction; failures come back as the error text.
#[instrument(level = "debug", skip(bytes), fields(bytes = bytes.len(), ?format))]
pub fn extract(bytes: &[u8], format: DocumentFormat) -> String {
  match try_extract(bytes, format) {
    Ok(text) => text,
    Err(e) => {
      warn!(target: "quizgen", error = %e, ?format, "Extraction failed; returning error text");
      e.to_string()
    }
  }
}

/// Same policy as `extract`, reading the document from disk first.
pub fn extract_path(path: &Path, format: DocumentFormat) -> String {
  match std::fs::read(path) {
    Ok(bytes) => extract(&bytes, format),
    Err(e) => {
      warn!(target: "quizgen", error = %e, path = %path.display(), "Failed to read upload");
      ExtractError::Io(e).to_string()
    }
  }
}

pub fn try_extract(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractError> {
  match format {
    DocumentFormat::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
    DocumentFormat::Pdf => extract_pdf(bytes),
    DocumentFormat::Docx => extract_docx(bytes),
  }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
  let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
  if doc.is_encrypted() {
    return Err(ExtractError::Pdf("document is encrypted".into()));
  }

  let mut text = String::new();
  // get_pages is keyed by page number, so iteration is in page order.
  for page_num in doc.get_pages().into_keys() {
    let page = doc.extract_text(&[page_num]).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    text.push_str(&page);
    text.push('\n');
  }
  debug!(target: "quizgen", chars = text.len(), "PDF extracted");
  Ok(text)
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
  let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
    .map_err(|e| ExtractError::Docx(e.to_string()))?;
  let mut xml = String::new();
  archive
    .by_name("word/document.xml")
    .map_err(|e| ExtractError::Docx(format!("cannot find word/document.xml: {e}")))?
    .read_to_string(&mut xml)
    .map_err(|e| ExtractError::Docx(e.to_string()))?;

  let paragraphs = docx_paragraphs(&xml)?;
  let mut text = String::new();
  for p in &paragraphs {
    text.push_str(p);
    text.push('\n');
  }
  debug!(target: "quizgen", paragraphs = paragraphs.len(), "DOCX extracted");
  Ok(text)
}

/// Paragraph texts from `word/document.xml`, in document order.
/// Empty paragraphs are kept so spacing survives. A paragraph nested inside
/// another (text boxes) is folded into its parent as its own line; the VML
/// copy under `mc:Fallback` is skipped so boxed text is not read twice.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
  let mut reader = Reader::from_str(xml);
  let mut paragraphs = Vec::new();
  let mut open: Vec<String> = Vec::new();
  let mut in_text = false;
  let mut fallback_depth = 0usize;

  loop {
    match reader.read_event() {
      Ok(Event::Start(e)) => match e.name().as_ref() {
        b"mc:Fallback" => fallback_depth += 1,
        _ if fallback_depth > 0 => {}
        b"w:p" => open.push(String::new()),
        b"w:t" => in_text = true,
        _ => {}
      },
      Ok(Event::Empty(e)) if fallback_depth == 0 => match (e.name().as_ref(), open.last_mut()) {
        (b"w:p", Some(parent)) => parent.push('\n'),
        (b"w:p", None) => paragraphs.push(String::new()),
        (b"w:tab", Some(cur)) => cur.push('\t'),
        (b"w:br" | b"w:cr", Some(cur)) => cur.push('\n'),
        _ => {}
      },
      Ok(Event::End(e)) => match e.name().as_ref() {
        b"mc:Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
        _ if fallback_depth > 0 => {}
        b"w:p" => {
          if let Some(done) = open.pop() {
            match open.last_mut() {
              Some(parent) => {
                parent.push_str(&done);
                parent.push('\n');
              }
              None => paragraphs.push(done),
            }
          }
        }
        b"w:t" => in_text = false,
        _ => {}
      },
      Ok(Event::Text(t)) if in_text && fallback_depth == 0 => {
        if let Some(cur) = open.last_mut() {
          let s = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
          cur.push_str(&s);
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => {
        return Err(ExtractError::Docx(format!("XML error at position {}: {e}", reader.buffer_position())));
      }
      _ => {}
    }
  }
  Ok(paragraphs)
}
