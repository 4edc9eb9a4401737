//! Document readers.
//!
//! Every reader returns plain text. Failures are logged and surface as an
//! empty string so a bad file yields no clauses instead of aborting a run.

use std::path::Path;

/// Document kinds recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.txt`, `.md` and anything without a known extension.
    Text,
    /// `.pdf`.
    Pdf,
    /// `.docx` (not supported).
    Word,
}

impl DocumentKind {
    /// Detects the kind from the file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("pdf") => Self::Pdf,
            Some("docx" | "doc") => Self::Word,
            _ => Self::Text,
        }
    }
}

/// Reads `path` as plain text.
///
/// Returns `""` (and logs a warning) when the file cannot be read, its
/// text cannot be extracted, or its format is unsupported.
#[must_use]
pub fn read_document(path: &Path) -> String {
    let kind = DocumentKind::from_path(path);
    tracing::debug!(path = %path.display(), ?kind, "reading document");

    match kind {
        DocumentKind::Text => read_text(path),
        DocumentKind::Pdf => read_pdf(path),
        DocumentKind::Word => {
            tracing::warn!(
                path = %path.display(),
                "Word documents are not supported; convert to PDF or text first"
            );
            String::new()
        }
    }
}

fn read_text(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read document");
            String::new()
        }
    }
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> String {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read PDF");
            return String::new();
        }
    };
    guarded_extract(path, || pdf_extract::extract_text_from_mem(&bytes))
}

/// Runs a PDF extractor, treating both an error and a panic as "no text".
///
/// `pdf-extract` panics on some malformed files instead of returning an
/// error. Containing the unwind here needs the release profile to keep
/// `panic = "unwind"`.
#[cfg(feature = "pdf")]
fn guarded_extract<E, F>(path: &Path, extract: F) -> String
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<String, E> + std::panic::UnwindSafe,
{
    match std::panic::catch_unwind(extract) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to extract PDF text");
            String::new()
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), "PDF extractor panicked");
            String::new()
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> String {
    tracing::warn!(
        path = %path.display(),
        "PDF support is disabled in this build (enable the `pdf` feature)"
    );
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("a.PDF")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("a.docx")), DocumentKind::Word);
        assert_eq!(DocumentKind::from_path(Path::new("a.md")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("README")), DocumentKind::Text);
    }

    #[test]
    fn test_read_text_file() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap_or_else(|_| unreachable!());
        write!(file, "1. Fees.\n\n2. Term.").unwrap_or_else(|_| unreachable!());
        assert_eq!(read_document(file.path()), "1. Fees.\n\n2. Term.");
    }

    #[test]
    fn test_missing_file_is_empty() {
        assert_eq!(read_document(Path::new("/nonexistent/contract.txt")), "");
    }

    #[test]
    fn test_docx_is_empty() {
        let file = NamedTempFile::with_suffix(".docx").unwrap_or_else(|_| unreachable!());
        assert_eq!(read_document(file.path()), "");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_corrupt_pdf_is_empty() {
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap_or_else(|_| unreachable!());
        file.write_all(b"not a pdf").unwrap_or_else(|_| unreachable!());
        assert_eq!(read_document(file.path()), "");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_panicking_extractor_is_contained() {
        let text = guarded_extract(Path::new("broken.pdf"), || -> Result<String, String> {
            unreachable!("malformed xref table")
        });
        assert_eq!(text, "");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_extractor_text_passes_through() {
        let text = guarded_extract(Path::new("ok.pdf"), || Ok::<_, String>("1. Fees.".to_string()));
        assert_eq!(text, "1. Fees.");
    }
}
