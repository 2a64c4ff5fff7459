//! Field map: where each logical field lives inside an article unit
//!
//! Order matters. Extraction walks the entries front to back and stops at
//! the first path with no match, leaving later fields unset.

use pubharvest_core::Field;

/// Repeating element holding one publication
pub const PUBMED_UNIT: &str = "PubmedArticle";

/// PubMed field paths, relative to `<PubmedArticle>`, in extraction order
pub const PUBMED_FIELDS: [(Field, &str); 5] = [
    (Field::Identifier, "MedlineCitation/PMID"),
    (
        Field::AbstractText,
        "MedlineCitation/Article/Abstract/AbstractText",
    ),
    (Field::Title, "MedlineCitation/Article/ArticleTitle"),
    (Field::Journal, "MedlineCitation/Article/Journal/Title"),
    (
        Field::PublicationYear,
        "MedlineCitation/Article/Journal/JournalIssue/PubDate/Year",
    ),
];

/// One (field, path) entry; the path is pre-split into element names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub field: Field,
    segments: Vec<Vec<u8>>,
}

impl FieldPath {
    pub fn new(field: Field, path: &str) -> Self {
        Self {
            field,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec())
                .collect(),
        }
    }

    /// True when `stack` (element names below the unit) is exactly this path
    pub fn matches(&self, stack: &[Vec<u8>]) -> bool {
        self.segments == stack
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&String::from_utf8_lossy(seg))?;
        }
        Ok(())
    }
}

/// Unit element name plus ordered field paths
#[derive(Debug, Clone)]
pub struct FieldMap {
    unit: Vec<u8>,
    entries: Vec<FieldPath>,
}

impl FieldMap {
    pub fn new<'a>(unit: &str, entries: impl IntoIterator<Item = (Field, &'a str)>) -> Self {
        Self {
            unit: unit.as_bytes().to_vec(),
            entries: entries
                .into_iter()
                .map(|(field, path)| FieldPath::new(field, path))
                .collect(),
        }
    }

    /// The fixed PubMed map
    pub fn pubmed() -> Self {
        Self::new(PUBMED_UNIT, PUBMED_FIELDS)
    }

    pub fn unit(&self) -> &[u8] {
        &self.unit
    }

    pub fn entries(&self) -> &[FieldPath] {
        &self.entries
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::pubmed()
    }
}
