//! Clause segmentation.
//!
//! Splits raw contract text into clause fragments on blank lines and on
//! line-leading section headers (`SECTION 3.`, `ARTICLE 2.`, `4.1.`, `7.`).
//! Headers never survive into a clause, including one that opens the text
//! or follows a blank line.

use std::sync::LazyLock;

use regex::Regex;

/// Blank line or a newline followed by a numbered header. The header is
/// consumed as part of the separator.
#[allow(clippy::expect_used)]
static CLAUSE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\n\s*(?:section\s+\d+\.|article\s+\d+\.|\d+\.\d+\.|\d+\.)\s+|\n{2,}")
        .expect("clause break regex is valid")
});

/// A header at the very start of a fragment.
#[allow(clippy::expect_used)]
static LEADING_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:section\s+\d+\.|article\s+\d+\.|\d+\.\d+\.|\d+\.)(?:\s+|$)")
        .expect("leading header regex is valid")
});

#[allow(clippy::expect_used)]
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("blank line regex is valid"));

/// Splits `text` into trimmed, non-empty clauses in document order.
///
/// Carriage returns are removed first. When the header-aware split yields at
/// most one fragment, the text is split on blank lines alone.
#[must_use]
pub fn segment(text: &str) -> Vec<String> {
    let normalized = text.replace('\r', "");

    let mut parts: Vec<&str> = CLAUSE_BREAK.split(&normalized).collect();
    if parts.len() <= 1 {
        parts = BLANK_LINES.split(&normalized).collect();
    }

    parts
        .into_iter()
        .map(|p| strip_header(p.trim()))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_header(fragment: &str) -> &str {
    match LEADING_HEADER.find(fragment) {
        Some(m) => fragment[m.end()..].trim_start(),
        None => fragment,
    }
}
