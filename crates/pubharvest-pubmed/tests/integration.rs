//! End-to-end extraction into a DuckDB store

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use pubharvest_core::{Field, FileSink, ProgressContext};
use pubharvest_db::Database;
use pubharvest_pubmed::{ArticleStream, Config, extract, run};
use tempfile::TempDir;

/// One `PubmedArticle`, leaving out the element for `omit` if given.
fn article(pmid: &str, omit: Option<Field>) -> String {
    let part = |field: Field, xml: String| {
        if omit == Some(field) { String::new() } else { xml }
    };
    format!(
        "<PubmedArticle><MedlineCitation Status=\"MEDLINE\">{}<Article>\
         <Journal>{}{}</Journal>{}{}\
         </Article></MedlineCitation></PubmedArticle>",
        part(Field::Identifier, format!("<PMID Version=\"1\">{pmid}</PMID>")),
        part(
            Field::PublicationYear,
            "<JournalIssue><PubDate><Year>2020</Year></PubDate></JournalIssue>".into()
        ),
        part(Field::Journal, "<Title>journal name</Title>".into()),
        part(Field::Title, "<ArticleTitle>article title</ArticleTitle>".into()),
        part(
            Field::AbstractText,
            "<Abstract><AbstractText>abstract text</AbstractText></Abstract>".into()
        ),
    )
}

fn document(articles: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<PubmedArticleSet>{}</PubmedArticleSet>",
        articles.concat()
    )
}

fn db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.create_schema().unwrap();
    db
}

fn write_gz(path: &Path, content: &str) {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(content.as_bytes()).unwrap();
    std::fs::write(path, enc.finish().unwrap()).unwrap();
}

#[test]
fn complete_article_is_stored() {
    let mut db = db();
    let xml = document(&[article("4325", None)]);

    let mut tx = db.begin_file().unwrap();
    let stats = extract(ArticleStream::from_xml(&xml), &mut tx).unwrap();
    tx.commit().unwrap();

    assert_eq!(stats.articles, 1);
    assert_eq!(stats.skipped(), 0);
    let row = db.get("4325").unwrap().unwrap();
    assert_eq!(row.title, "article title");
    assert_eq!(row.abstract_text, "abstract text");
    assert_eq!(row.journal, "journal name");
    assert_eq!(row.publication_year, "2020");
}

#[test]
fn missing_abstract_is_skipped() {
    let mut db = db();
    let xml = document(&[article("4325", Some(Field::AbstractText))]);

    let mut tx = db.begin_file().unwrap();
    let stats = extract(ArticleStream::from_xml(&xml), &mut tx).unwrap();
    tx.commit().unwrap();

    assert_eq!(stats.articles, 1);
    assert_eq!(stats.skipped(), 1);
    assert_eq!(db.count().unwrap(), 0);
}

#[test]
fn any_missing_field_prevents_storage() {
    for field in Field::ALL {
        let mut db = db();
        let xml = document(&[article("1", Some(field)), article("2", None)]);

        let mut tx = db.begin_file().unwrap();
        let stats = extract(ArticleStream::from_xml(&xml), &mut tx).unwrap();
        tx.commit().unwrap();

        assert_eq!(stats.incomplete, 1, "omitting {field}");
        assert_eq!(db.count().unwrap(), 1, "omitting {field}");
        assert!(db.get("1").unwrap().is_none(), "omitting {field}");
    }
}

#[test]
fn counts_add_up_over_mixed_document() {
    let mut db = db();
    let mut articles: Vec<_> = (0..20).map(|i| article(&i.to_string(), None)).collect();
    articles.push(article("5", None));
    articles.push(article("90", Some(Field::Journal)));
    articles.push(article("91", Some(Field::Identifier)));
    let xml = document(&articles);

    let mut tx = db.begin_file().unwrap();
    let stats = extract(ArticleStream::from_xml(&xml), &mut tx).unwrap();
    tx.commit().unwrap();

    assert_eq!(stats.articles, 23);
    assert_eq!(stats.inserted, 20);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.incomplete, 2);
    assert_eq!(stats.inserted + stats.skipped(), stats.articles);
    assert_eq!(db.count().unwrap(), 20);
}

#[test]
fn run_over_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("a.xml"),
        document(&[article("1", None), article("2", Some(Field::Title))]),
    )
    .unwrap();
    write_gz(
        &dir.path().join("b.xml.gz"),
        &document(&[article("3", None), article("1", None)]),
    );
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let config = Config {
        input_dir: dir.path().to_path_buf(),
        max_files: None,
    };
    let mut db = db();
    let summary = run(&config, &mut db, &ProgressContext::hidden()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.completed_files, 2);
    assert_eq!(summary.stats.articles, 4);
    assert_eq!(summary.stats.inserted, 2);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(db.count().unwrap(), 2);
}

#[test]
fn rerun_inserts_nothing_new() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("a.xml"),
        document(&[article("1", None), article("2", None)]),
    )
    .unwrap();
    let config = Config {
        input_dir: dir.path().to_path_buf(),
        max_files: None,
    };
    let mut db = db();

    let first = run(&config, &mut db, &ProgressContext::hidden()).unwrap();
    let second = run(&config, &mut db, &ProgressContext::hidden()).unwrap();

    assert_eq!(first.stats.inserted, 2);
    assert_eq!(second.stats.articles, 2);
    assert_eq!(second.stats.inserted, 0);
    assert_eq!(second.stats.duplicates, 2);
    assert_eq!(db.count().unwrap(), 2);
}

#[test]
fn malformed_file_leaves_no_rows_and_run_continues() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.xml"), document(&[article("1", None)])).unwrap();
    // Two complete articles, then cut off mid-document
    let truncated = format!(
        "<PubmedArticleSet>{}{}<PubmedArticle><MedlineCitation>",
        article("10", None),
        article("11", None)
    );
    std::fs::write(dir.path().join("b.xml"), truncated).unwrap();
    std::fs::write(dir.path().join("c.xml"), document(&[article("3", None)])).unwrap();

    let config = Config {
        input_dir: dir.path().to_path_buf(),
        max_files: None,
    };
    let mut db = db();
    let summary = run(&config, &mut db, &ProgressContext::hidden()).unwrap();

    assert_eq!(summary.completed_files, 2);
    assert_eq!(summary.failed_files, 1);
    assert!(summary.failures[0].path.ends_with("b.xml"));
    assert_eq!(db.count().unwrap(), 2);
    assert!(db.get("10").unwrap().is_none());
    assert!(db.get("3").unwrap().is_some());
}

#[test]
fn max_files_limits_run() {
    let dir = TempDir::new().unwrap();
    for name in ["a.xml", "b.xml", "c.xml"] {
        std::fs::write(dir.path().join(name), document(&[article(name, None)])).unwrap();
    }
    let config = Config {
        input_dir: dir.path().to_path_buf(),
        max_files: Some(2),
    };
    let mut db = db();
    let summary = run(&config, &mut db, &ProgressContext::hidden()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert!(db.get("c.xml").unwrap().is_none());
}

#[test]
fn bad_entity_in_unmapped_element_voids_file() {
    let dir = TempDir::new().unwrap();
    // Bare `&` in <Volume>, which no field reads
    let bad = document(&[article("1", None)]).replace(
        "<JournalIssue>",
        "<JournalIssue><Volume>12 & 13</Volume>",
    );
    std::fs::write(dir.path().join("a.xml"), bad).unwrap();
    std::fs::write(dir.path().join("b.xml"), document(&[article("2", None)])).unwrap();

    let config = Config {
        input_dir: dir.path().to_path_buf(),
        max_files: None,
    };
    let mut db = db();
    let summary = run(&config, &mut db, &ProgressContext::hidden()).unwrap();

    assert_eq!(summary.failed_files, 1);
    assert!(summary.failures[0].path.ends_with("a.xml"));
    assert!(db.get("1").unwrap().is_none());
    assert_eq!(db.count().unwrap(), 1);
}

#[test]
fn large_gzip_export_streams_through() {
    const UNITS: usize = 12_000;
    let articles: Vec<_> = (0..UNITS)
        .map(|i| match i % 10 {
            // Re-uses an earlier PMID
            3 => article(&(i - 3).to_string(), None),
            7 => article(&i.to_string(), Some(Field::AbstractText)),
            _ => article(&i.to_string(), None),
        })
        .collect();
    let dir = TempDir::new().unwrap();
    write_gz(&dir.path().join("pubmed26n0001.xml.gz"), &document(&articles));

    let config = Config {
        input_dir: dir.path().to_path_buf(),
        max_files: None,
    };
    let mut db = db();
    let summary = run(&config, &mut db, &ProgressContext::hidden()).unwrap();
    let stats = summary.stats;

    assert_eq!(summary.completed_files, 1);
    assert_eq!(stats.articles, UNITS);
    assert_eq!(stats.duplicates, UNITS / 10);
    assert_eq!(stats.incomplete, UNITS / 10);
    assert_eq!(stats.inserted, UNITS - UNITS / 5);
    assert_eq!(stats.inserted + stats.skipped(), stats.articles);
    assert_eq!(db.count().unwrap(), stats.inserted as u64);
}
