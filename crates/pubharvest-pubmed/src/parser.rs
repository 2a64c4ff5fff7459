//! Streaming PubMed XML parser using quick-xml
//!
//! [`ArticleStream`] pulls events from any `BufRead` and yields one
//! [`PublicationRecord`] per `<PubmedArticle>`. Only the current unit's path
//! stack and one text slot per mapped field are held in memory, so document
//! size does not matter.

use std::io::BufRead;

use pubharvest_core::PublicationRecord;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::fields::FieldMap;

/// Source document is not well-formed XML
#[derive(Debug)]
pub enum ParseError {
    /// Reader-level failure: mismatched tags, bad entity, I/O, encoding
    Xml(quick_xml::Error),
    /// Structure quick-xml accepts but a complete document must not have
    Malformed(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML error: {e}"),
            Self::Malformed(msg) => write!(f, "malformed document: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

/// Lazy sequence of extraction attempts, one per article unit, in document order.
///
/// Yields `Err` at most once; the stream is finished afterwards.
pub struct ArticleStream<R> {
    reader: Reader<R>,
    map: FieldMap,
    buf: Vec<u8>,
    /// Open elements outside any unit
    depth: usize,
    /// The document element has been closed
    root_closed: bool,
    units: usize,
    finished: bool,
}

impl<'a> ArticleStream<&'a [u8]> {
    /// Stream over an in-memory document with the PubMed field map
    pub fn from_xml(xml: &'a str) -> Self {
        Self::new(xml.as_bytes(), FieldMap::pubmed())
    }
}

impl<R: BufRead> ArticleStream<R> {
    pub fn new(source: R, map: FieldMap) -> Self {
        Self {
            reader: Reader::from_reader(source),
            map,
            buf: Vec::new(),
            depth: 0,
            root_closed: false,
            units: 0,
            finished: false,
        }
    }

    /// Units yielded so far
    pub fn units_seen(&self) -> usize {
        self.units
    }

    fn next_unit(&mut self) -> Result<Option<PublicationRecord>, ParseError> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    check_single_root(self.depth, self.root_closed, e.name().as_ref())?;
                    if e.name().as_ref() == self.map.unit() {
                        let record = read_unit(&mut self.reader, &self.map)?;
                        if self.depth == 0 {
                            self.root_closed = true;
                        }
                        return Ok(Some(record));
                    }
                    self.depth += 1;
                }
                Event::Empty(e) => {
                    check_single_root(self.depth, self.root_closed, e.name().as_ref())?;
                    if self.depth == 0 {
                        self.root_closed = true;
                    }
                    // Childless unit: the first path misses
                    if e.name().as_ref() == self.map.unit() {
                        return Ok(Some(PublicationRecord::default()));
                    }
                }
                Event::End(e) => {
                    if self.depth == 0 {
                        return Err(ParseError::Malformed(format!(
                            "unexpected </{}> at byte {}",
                            String::from_utf8_lossy(e.name().as_ref()),
                            self.reader.buffer_position()
                        )));
                    }
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.root_closed = true;
                    }
                }
                Event::Text(t) => {
                    // Entities are checked everywhere, not just in captured fields
                    let text = t.unescape()?;
                    if self.depth == 0 && !text.trim().is_empty() {
                        return Err(ParseError::Malformed(format!(
                            "text outside the root element at byte {}",
                            self.reader.buffer_position()
                        )));
                    }
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(ParseError::Malformed(format!(
                            "document ends with {} unclosed element(s)",
                            self.depth
                        )));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ArticleStream<R> {
    type Item = Result<PublicationRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_unit() {
            Ok(Some(record)) => {
                self.units += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for ArticleStream<R> {}

/// Per-field capture state within one unit
#[derive(Debug, Clone)]
enum Slot {
    Unmatched,
    Capturing(String),
    Done(String),
}

impl Slot {
    fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing(_))
    }

    fn finish(&mut self) {
        if let Self::Capturing(text) = self {
            *self = Self::Done(std::mem::take(text));
        }
    }
}

/// A well-formed document has exactly one top-level element.
fn check_single_root(depth: usize, root_closed: bool, name: &[u8]) -> Result<(), ParseError> {
    if depth == 0 && root_closed {
        return Err(ParseError::Malformed(format!(
            "second root element <{}>",
            String::from_utf8_lossy(name)
        )));
    }
    Ok(())
}

/// Consume events up to the unit's end tag, capturing the first match of each path.
fn read_unit<R: BufRead>(
    reader: &mut Reader<R>,
    map: &FieldMap,
) -> Result<PublicationRecord, ParseError> {
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut slots = vec![Slot::Unmatched; map.entries().len()];

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                stack.push(e.name().as_ref().to_vec());
                for (slot, path) in slots.iter_mut().zip(map.entries()) {
                    if matches!(slot, Slot::Unmatched) && path.matches(&stack) {
                        *slot = Slot::Capturing(String::new());
                    }
                }
            }
            Event::Empty(e) => {
                stack.push(e.name().as_ref().to_vec());
                for (slot, path) in slots.iter_mut().zip(map.entries()) {
                    if matches!(slot, Slot::Unmatched) && path.matches(&stack) {
                        *slot = Slot::Done(String::new());
                    }
                }
                stack.pop();
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if slots.iter().any(Slot::is_capturing) {
                    append_to_capturing(&mut slots, &text);
                }
            }
            Event::CData(c) => {
                if slots.iter().any(Slot::is_capturing) {
                    append_to_capturing(&mut slots, &String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                // Reader checks end names, so an End at the unit's own level closes it
                if stack.is_empty() {
                    break;
                }
                let depth = stack.len();
                for (slot, path) in slots.iter_mut().zip(map.entries()) {
                    if path.depth() == depth {
                        slot.finish();
                    }
                }
                stack.pop();
            }
            Event::Eof => {
                return Err(ParseError::Malformed(format!(
                    "document ends inside <{}>",
                    String::from_utf8_lossy(map.unit())
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(build_record(map, slots))
}

fn append_to_capturing(slots: &mut [Slot], text: &str) {
    for slot in slots {
        if let Slot::Capturing(s) = slot {
            s.push_str(text);
        }
    }
}

/// Walk the map in order; stop at the first path that never matched.
fn build_record(map: &FieldMap, slots: Vec<Slot>) -> PublicationRecord {
    let mut record = PublicationRecord::default();
    for (path, slot) in map.entries().iter().zip(slots) {
        let text = match slot {
            Slot::Unmatched => break,
            Slot::Capturing(text) | Slot::Done(text) => text,
        };
        // Whitespace-only counts as empty; anything else is stored as written
        if !text.trim().is_empty() {
            record.set(path.field, text);
        }
    }
    record
}
