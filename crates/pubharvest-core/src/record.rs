//! Publication record model
//!
//! One [`PublicationRecord`] is built per article unit and dropped once it has
//! been routed to a sink or counted as skipped.

use serde::Serialize;

/// Logical fields extracted for every publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Identifier,
    Title,
    AbstractText,
    Journal,
    PublicationYear,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Identifier,
        Field::Title,
        Field::AbstractText,
        Field::Journal,
        Field::PublicationYear,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Title => "title",
            Self::AbstractText => "abstract_text",
            Self::Journal => "journal",
            Self::PublicationYear => "publication_year",
        }
    }

    /// Column in the `publications` table
    pub const fn column(self) -> &'static str {
        match self {
            Self::Identifier => "pmid",
            Self::Title => "title",
            Self::AbstractText => "pub_abstract",
            Self::Journal => "journal",
            Self::PublicationYear => "pub_year",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Candidate publication with up to five extracted fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationRecord {
    /// Source-assigned key (PMID), used as the primary key downstream
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    /// Kept as text: sources carry partial or non-numeric years
    pub publication_year: Option<String>,
}

impl PublicationRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Identifier => self.identifier.as_deref(),
            Field::Title => self.title.as_deref(),
            Field::AbstractText => self.abstract_text.as_deref(),
            Field::Journal => self.journal.as_deref(),
            Field::PublicationYear => self.publication_year.as_deref(),
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Identifier => &mut self.identifier,
            Field::Title => &mut self.title,
            Field::AbstractText => &mut self.abstract_text,
            Field::Journal => &mut self.journal,
            Field::PublicationYear => &mut self.publication_year,
        };
        *slot = Some(value);
    }

    /// True iff every field is present and non-empty
    pub fn is_complete(&self) -> bool {
        Field::ALL
            .iter()
            .all(|&f| self.get(f).is_some_and(|v| !v.is_empty()))
    }

    /// Fields that are absent or empty, in [`Field::ALL`] order
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&f| self.get(f).is_none_or(str::is_empty))
            .collect()
    }

    /// Convert into a [`CompleteRecord`], handing the record back if any field is missing.
    pub fn into_complete(self) -> Result<CompleteRecord, Self> {
        if !self.is_complete() {
            return Err(self);
        }
        match self {
            Self {
                identifier: Some(identifier),
                title: Some(title),
                abstract_text: Some(abstract_text),
                journal: Some(journal),
                publication_year: Some(publication_year),
            } => Ok(CompleteRecord {
                identifier,
                title,
                abstract_text,
                journal,
                publication_year,
            }),
            incomplete => Err(incomplete),
        }
    }
}

/// A record with every field present; the only shape a sink accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteRecord {
    pub identifier: String,
    pub title: String,
    pub abstract_text: String,
    pub journal: String,
    pub publication_year: String,
}

impl From<CompleteRecord> for PublicationRecord {
    fn from(r: CompleteRecord) -> Self {
        Self {
            identifier: Some(r.identifier),
            title: Some(r.title),
            abstract_text: Some(r.abstract_text),
            journal: Some(r.journal),
            publication_year: Some(r.publication_year),
        }
    }
}
