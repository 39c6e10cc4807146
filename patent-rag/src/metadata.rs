//! Rule-based extraction of structured patent fields from raw text.
//!
//! Extraction is a pure function of `(text, filename)` and degrades
//! gracefully: each rule is applied independently and a rule that does
//! not match falls back to its field default instead of failing the
//! document. The rules are deliberately kept behind this module boundary
//! so a different extractor can replace them without touching callers.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Patent number token in filenames: country code plus 7–8 digits.
static PATENT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2}\d{7,8}").unwrap());

/// `Title:` label up to end of line.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Title[:\s]+([^\n]+)").unwrap());

/// `Abstract:` label up to the next blank line or ALL-CAPS section label.
static ABSTRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Abstract[:\s]+(.+?)(?:\n\s*\n|\n[A-Z]+:|\z)").unwrap());

/// `Claims:` section up to the next blank-line-delimited ALL-CAPS label.
static CLAIMS_SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Claims[:\s]+(.*?)(?:\n\n[A-Z]+:|\z)").unwrap());

/// Leading `<number>.` marker that starts an individual claim.
static CLAIM_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").unwrap());

/// Structured fields extracted from a patent document.
///
/// Every field has a defined default, so partial or malformed documents
/// still yield a usable record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatentMetadata {
    /// Patent number taken from the filename, e.g. `US11391262`.
    pub patent_number: Option<String>,
    /// Patent title, `"Unknown Title"` when no title label is found.
    pub title: String,
    /// Abstract text, empty when no abstract label is found.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Individual claims in document order, empty when absent.
    pub claims: Vec<String>,
}

impl Default for PatentMetadata {
    fn default() -> Self {
        Self {
            patent_number: None,
            title: "Unknown Title".to_string(),
            abstract_text: String::new(),
            claims: Vec::new(),
        }
    }
}

/// Extract patent metadata from document text and source filename.
///
/// Idempotent: identical `(text, filename)` input always yields an
/// identical record.
pub fn extract(text: &str, filename: &str) -> PatentMetadata {
    PatentMetadata {
        patent_number: extract_patent_number(filename),
        title: extract_title(text),
        abstract_text: extract_abstract(text),
        claims: extract_claims(text),
    }
}

fn extract_patent_number(filename: &str) -> Option<String> {
    PATENT_NUMBER_RE.find(filename).map(|m| m.as_str().to_string())
}

fn extract_title(text: &str) -> String {
    TITLE_RE
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| "Unknown Title".to_string())
}

fn extract_abstract(text: &str) -> String {
    ABSTRACT_RE.captures(text).map(|c| c[1].trim().to_string()).unwrap_or_default()
}

fn extract_claims(text: &str) -> Vec<String> {
    let Some(section) = CLAIMS_SECTION_RE.captures(text) else {
        return Vec::new();
    };
    let section = section.get(1).map(|m| m.as_str()).unwrap_or_default();

    // Slice the section between consecutive claim markers.
    let markers: Vec<_> = CLAIM_MARKER_RE.find_iter(section).collect();
    let mut claims = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let start = marker.end();
        let end = markers.get(i + 1).map_or(section.len(), |next| next.start());
        let claim = section[start..end].trim();
        if !claim.is_empty() {
            claims.push(claim.to_string());
        }
    }
    claims
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Title: Method X
Inventor: J. Doe

Abstract: some text
spanning two lines

Claims:
1. A method comprising a first step.
2. The method of claim 1, wherein the
step is repeated.

DESCRIPTION:
Further detail.";

    #[test]
    fn extracts_all_fields() {
        let meta = extract(SAMPLE, "US1234567.pdf");
        assert_eq!(meta.patent_number.as_deref(), Some("US1234567"));
        assert_eq!(meta.title, "Method X");
        assert_eq!(meta.abstract_text, "some text\nspanning two lines");
        assert_eq!(meta.claims.len(), 2);
        assert_eq!(meta.claims[0], "A method comprising a first step.");
        assert!(meta.claims[1].starts_with("The method of claim 1"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let meta = extract("no labels here at all", "notes.txt");
        assert_eq!(meta.patent_number, None);
        assert_eq!(meta.title, "Unknown Title");
        assert_eq!(meta.abstract_text, "");
        assert!(meta.claims.is_empty());
    }

    #[test]
    fn patent_number_requires_seven_to_eight_digits() {
        assert_eq!(extract("", "US123456.pdf").patent_number, None);
        assert_eq!(extract("", "US12345678.pdf").patent_number.as_deref(), Some("US12345678"));
        assert_eq!(extract("", "EP7654321-spec.txt").patent_number.as_deref(), Some("EP7654321"));
    }

    #[test]
    fn abstract_stops_at_all_caps_label() {
        let text = "Abstract: short summary\nCLAIMS: 1. something";
        assert_eq!(extract(text, "f.txt").abstract_text, "short summary");
    }

    #[test]
    fn extraction_is_idempotent() {
        let a = extract(SAMPLE, "US1234567.pdf");
        let b = extract(SAMPLE, "US1234567.pdf");
        assert_eq!(a, b);
    }

    #[test]
    fn one_rule_failing_does_not_affect_others() {
        let text = "Title: Only a title, nothing else";
        let meta = extract(text, "untitled.txt");
        assert_eq!(meta.title, "Only a title, nothing else");
        assert_eq!(meta.abstract_text, "");
        assert!(meta.claims.is_empty());
    }
}
