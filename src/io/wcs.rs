//! WCS header extraction from ASTAP output files.
//!
//! ASTAP writes its plate solution as `<prefix>.wcs`, a text file of
//! FITS-like `KEY = VALUE / COMMENT` lines, next to a `<prefix>.ini`
//! settings dump. This module parses the header into an ordered document
//! and takes care of best-effort cleanup of both files. The prefix is
//! caller-chosen; the high-level API allocates a unique one per invocation.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Value of a header card: FITS booleans (`T`/`F`), numbers, or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// One structured `KEY = VALUE / COMMENT` header entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub key: String,
    pub value: HeaderValue,
    pub comment: Option<String>,
}

/// A parsed header line: a key/value card or a free-text comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    Card(Card),
    Comment(String),
}

/// Ordered header document, mirroring source file order. Duplicate keys are
/// kept as separate entries, never merged.
pub type HeaderDocument = Vec<HeaderEntry>;

/// Parse a single header line.
///
/// Blank lines and lines without `=` yield `None`; a leading literal
/// `COMMENT` token yields a comment entry; everything else splits on the
/// first `=` (and optionally the first `/`) into a typed card. Malformed
/// lines are never an error, they are simply discarded.
pub fn parse_card(line: &str) -> Option<HeaderEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix("COMMENT") {
        return Some(HeaderEntry::Comment(rest.trim().to_string()));
    }

    let (key, rest) = line.split_once('=')?;
    let (value_part, comment) = match rest.split_once('/') {
        Some((value, comment)) => (value.trim(), Some(comment.trim().to_string())),
        None => (rest.trim(), None),
    };

    let value = match value_part {
        "T" => HeaderValue::Bool(true),
        "F" => HeaderValue::Bool(false),
        other => match other.parse::<f64>() {
            Ok(n) => HeaderValue::Number(n),
            Err(_) => HeaderValue::Text(
                other
                    .trim_matches(|c| c == '\'' || c == '"' || c == ' ')
                    .to_string(),
            ),
        },
    };

    Some(HeaderEntry::Card(Card {
        key: key.trim().to_string(),
        value,
        comment,
    }))
}

/// Parse a whole header: skip until the first `CTYPE` line, then take that
/// line and every subsequent one. If no `CTYPE` line exists the document is
/// empty, which is the intended "no solution" fallback rather than an error.
pub fn parse_document<'a>(lines: impl IntoIterator<Item = &'a str>) -> HeaderDocument {
    let mut doc = Vec::new();
    let mut lines = lines.into_iter();

    for line in lines.by_ref() {
        if line.trim().starts_with("CTYPE") {
            if let Some(entry) = parse_card(line) {
                doc.push(entry);
            }
            break;
        }
    }
    for line in lines {
        if let Some(entry) = parse_card(line) {
            doc.push(entry);
        }
    }

    doc
}

/// Removes the solver product files when dropped. Removal is best-effort on
/// every exit path; a file that is already gone never raises.
struct ProductFiles {
    paths: [PathBuf; 2],
    delete: bool,
}

impl Drop for ProductFiles {
    fn drop(&mut self) {
        if !self.delete {
            return;
        }
        for path in &self.paths {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!("failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Extract the WCS header document from `<parent>/<prefix>.wcs`.
///
/// A missing `.wcs` file means the solver produced no result and yields an
/// empty document. With `delete = true` both product files are removed
/// after reading, even when reading fails partway.
pub fn extract_wcs(parent: &Path, prefix: &str, delete: bool) -> io::Result<HeaderDocument> {
    let wcs_path = parent.join(format!("{}.wcs", prefix));
    let ini_path = parent.join(format!("{}.ini", prefix));
    let _cleanup = ProductFiles {
        paths: [wcs_path.clone(), ini_path],
        delete,
    };

    if !wcs_path.exists() {
        debug!("no solution file at {}", wcs_path.display());
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(&wcs_path)?;
    Ok(parse_document(text.lines()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(entry: &HeaderEntry) -> &Card {
        match entry {
            HeaderEntry::Card(c) => c,
            other => panic!("expected card, got {:?}", other),
        }
    }

    #[test]
    fn blank_and_flag_free_lines_are_discarded() {
        assert_eq!(parse_card(""), None);
        assert_eq!(parse_card("   \t "), None);
        assert_eq!(parse_card("END"), None);
        assert_eq!(parse_card("no equals sign here"), None);
    }

    #[test]
    fn comment_lines_keep_the_trimmed_remainder() {
        assert_eq!(
            parse_card("COMMENT Solved in 1.2 sec "),
            Some(HeaderEntry::Comment("Solved in 1.2 sec".into()))
        );
        assert_eq!(parse_card("COMMENT"), Some(HeaderEntry::Comment("".into())));
    }

    #[test]
    fn booleans_parse_from_t_and_f() {
        let t = parse_card("PLTSOLVD=                    T / Solved").unwrap();
        assert_eq!(card(&t).value, HeaderValue::Bool(true));
        let f = parse_card("PLTSOLVD= F").unwrap();
        assert_eq!(card(&f).value, HeaderValue::Bool(false));
    }

    #[test]
    fn numbers_and_strings_round_trip() {
        let entry = parse_card("CRVAL1  =   8.791666666667E+001 / RA of reference pixel").unwrap();
        let c = card(&entry);
        assert_eq!(c.key, "CRVAL1");
        assert_eq!(c.value, HeaderValue::Number(87.91666666667));
        assert_eq!(c.comment.as_deref(), Some("RA of reference pixel"));

        let entry = parse_card("CTYPE1  = 'RA---TAN'           / first axis").unwrap();
        let c = card(&entry);
        assert_eq!(c.value, HeaderValue::Text("RA---TAN".into()));

        let entry = parse_card("OBJECT  = \"M42\"").unwrap();
        assert_eq!(card(&entry).value, HeaderValue::Text("M42".into()));
        assert_eq!(card(&entry).comment, None);
    }

    #[test]
    fn only_the_first_equals_and_slash_split() {
        let entry = parse_card("WARNING = 'a=b'   / ratio x/y").unwrap();
        let c = card(&entry);
        assert_eq!(c.key, "WARNING");
        assert_eq!(c.value, HeaderValue::Text("a=b".into()));
        assert_eq!(c.comment.as_deref(), Some("ratio x/y"));
    }

    #[test]
    fn document_starts_at_ctype_and_preserves_order() {
        let text = "SIMPLE  =                    T\n\
                    BITPIX  =                    8\n\
                    CTYPE1  = 'RA---TAN' / comment\n\
                    CRVAL1  =              123.456\n\
                    COMMENT solved\n";
        let doc = parse_document(text.lines());
        assert_eq!(
            doc,
            vec![
                HeaderEntry::Card(Card {
                    key: "CTYPE1".into(),
                    value: HeaderValue::Text("RA---TAN".into()),
                    comment: Some("comment".into()),
                }),
                HeaderEntry::Card(Card {
                    key: "CRVAL1".into(),
                    value: HeaderValue::Number(123.456),
                    comment: None,
                }),
                HeaderEntry::Comment("solved".into()),
            ]
        );
    }

    #[test]
    fn duplicate_keys_stay_separate() {
        let text = "CTYPE1 = 'RA---TAN'\nWARNING = 'first'\nWARNING = 'second'\n";
        let doc = parse_document(text.lines());
        assert_eq!(doc.len(), 3);
        assert_eq!(card(&doc[1]).value, HeaderValue::Text("first".into()));
        assert_eq!(card(&doc[2]).value, HeaderValue::Text("second".into()));
    }

    #[test]
    fn no_ctype_means_empty_document() {
        let text = "SIMPLE = T\nCRVAL1 = 1.0\nCOMMENT nothing solved\n";
        assert!(parse_document(text.lines()).is_empty());
    }

    #[test]
    fn missing_wcs_file_yields_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = extract_wcs(dir.path(), "solution", true).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn extraction_reads_and_deletes_both_products() {
        let dir = tempfile::tempdir().unwrap();
        let wcs = dir.path().join("solution.wcs");
        let ini = dir.path().join("solution.ini");
        fs::write(&wcs, "CTYPE1 = 'RA---TAN'\nCRVAL1 = 83.8\n").unwrap();
        fs::write(&ini, "[astap]\n").unwrap();

        let doc = extract_wcs(dir.path(), "solution", true).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(!wcs.exists());
        assert!(!ini.exists());
        // The document stays valid after its backing files are gone.
        assert_eq!(card(&doc[1]).value, HeaderValue::Number(83.8));
    }

    #[test]
    fn extraction_keeps_files_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let wcs = dir.path().join("keep.wcs");
        fs::write(&wcs, "CTYPE1 = 'RA---TAN'\n").unwrap();

        let doc = extract_wcs(dir.path(), "keep", false).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(wcs.exists());
    }

    #[test]
    fn deletion_tolerates_a_missing_ini() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lone.wcs"), "CTYPE1 = 'RA---TAN'\n").unwrap();
        // No .ini on disk; cleanup must not raise.
        let doc = extract_wcs(dir.path(), "lone", true).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(!dir.path().join("lone.wcs").exists());
    }

    #[test]
    fn entries_serialize_to_json() {
        let doc = parse_document("CTYPE1 = 'RA---TAN' / axis\nCOMMENT done\n".lines());
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"key\":\"CTYPE1\""));
        assert!(json.contains("\"done\""));
    }
}
