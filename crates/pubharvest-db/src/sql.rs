//! SQL for the `publications` table.
//!
//! Column names come from [`Field::column`], so the table and the record
//! model cannot drift apart.

use pubharvest_core::Field;

pub const TABLE: &str = "publications";

/// DDL for the publications table; every column is mandatory.
pub fn create_table() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE} (
            {} VARCHAR PRIMARY KEY,
            {} VARCHAR NOT NULL,
            {} VARCHAR NOT NULL,
            {} VARCHAR NOT NULL,
            {} VARCHAR NOT NULL
        )",
        Field::Identifier.column(),
        Field::AbstractText.column(),
        Field::Title.column(),
        Field::Journal.column(),
        Field::PublicationYear.column(),
    )
}

pub fn delete_all() -> String {
    format!("DELETE FROM {TABLE}")
}

/// Existence probe by key, used before every insert
pub fn exists() -> String {
    format!(
        "SELECT COUNT(*) FROM {TABLE} WHERE {} = ?",
        Field::Identifier.column()
    )
}

/// Insert with parameters in [`Field::ALL`] order
pub fn insert() -> String {
    let cols: Vec<_> = Field::ALL.iter().map(|f| f.column()).collect();
    let params = vec!["?"; cols.len()];
    format!(
        "INSERT INTO {TABLE} ({}) VALUES ({})",
        cols.join(", "),
        params.join(", ")
    )
}

pub fn count() -> String {
    format!("SELECT COUNT(*) FROM {TABLE}")
}

/// Select one row, columns in [`Field::ALL`] order
pub fn select_one() -> String {
    let cols: Vec<_> = Field::ALL.iter().map(|f| f.column()).collect();
    format!(
        "SELECT {} FROM {TABLE} WHERE {} = ?",
        cols.join(", "),
        Field::Identifier.column()
    )
}

pub fn year_counts() -> String {
    let year = Field::PublicationYear.column();
    format!("SELECT {year}, COUNT(*) FROM {TABLE} GROUP BY {year} ORDER BY {year}")
}
