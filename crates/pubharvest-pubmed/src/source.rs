//! Opening source files: plain `.xml` or gzip-compressed `.xml.gz`

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use pubharvest_core::ByteCounter;

/// Buffer size for source readers (256KB)
const SOURCE_BUF_SIZE: usize = 256 * 1024;

/// Opened source document with progress bookkeeping
pub struct Source {
    pub reader: Box<dyn BufRead>,
    /// On-disk bytes consumed so far (compressed bytes for `.gz`)
    pub counter: ByteCounter,
    /// On-disk file size
    pub total_bytes: u64,
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("total_bytes", &self.total_bytes)
            .finish_non_exhaustive()
    }
}

/// Whether a path names a gzip-compressed file
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a file for streaming; `.gz` files are decompressed on the fly.
pub fn open_source(path: &Path) -> Result<Source> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let total_bytes = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    let counter = Arc::new(AtomicU64::new(0));
    let counting = CountingReader {
        inner: file,
        count: counter.clone(),
    };

    let reader: Box<dyn BufRead> = if is_gzip(path) {
        Box::new(BufReader::with_capacity(
            SOURCE_BUF_SIZE,
            MultiGzDecoder::new(counting),
        ))
    } else {
        Box::new(BufReader::with_capacity(SOURCE_BUF_SIZE, counting))
    };

    Ok(Source {
        reader,
        counter,
        total_bytes,
    })
}

/// Reader wrapper that tracks bytes read
pub struct CountingReader<R> {
    inner: R,
    count: ByteCounter,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::TempDir;

    const XML: &str = "<PubmedArticleSet></PubmedArticleSet>";

    #[test]
    fn gzip_detection_by_extension() {
        assert!(is_gzip(Path::new("pubmed26n0001.xml.gz")));
        assert!(!is_gzip(Path::new("pubmed26n0001.xml")));
        assert!(!is_gzip(Path::new("gz")));
    }

    #[test]
    fn open_plain_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.xml");
        std::fs::write(&path, XML).unwrap();

        let mut source = open_source(&path).unwrap();
        let mut content = String::new();
        source.reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, XML);
        assert_eq!(source.total_bytes, XML.len() as u64);
        assert_eq!(source.counter.load(Ordering::Relaxed), XML.len() as u64);
    }

    #[test]
    fn open_gzip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.xml.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(XML.as_bytes()).unwrap();
        let compressed = enc.finish().unwrap();
        std::fs::write(&path, &compressed).unwrap();

        let mut source = open_source(&path).unwrap();
        let mut content = String::new();
        source.reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, XML);
        assert_eq!(source.total_bytes, compressed.len() as u64);
    }

    #[test]
    fn open_missing_file_fails_with_path() {
        let dir = TempDir::new().unwrap();
        let err = open_source(&dir.path().join("nope.xml")).unwrap_err();
        assert!(format!("{err}").contains("nope.xml"));
    }
}
