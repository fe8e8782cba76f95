//! Parser for Debian-control-style paragraphs of colon-separated fields.
//!
//! The format is the RFC822-derived dialect used by APT index files
//! (`Packages`, `Release`) and package `control` files: paragraphs of
//! `Name: Value` fields separated by blank lines, with values continued
//! across lines by leading whitespace. Parsing is lossy: comments and
//! unrecognizable lines are discarded, and field values are kept as
//! opaque strings.
//!
//! Within a paragraph, field names are unique. A duplicated name keeps
//! the position where it first appeared and the value it was last given,
//! both when parsing and when mutating through [`Paragraph::set`].
//!
//! # Example
//!
//! ```rust
//! use control_parse::ControlFile;
//!
//! let doc = ControlFile::parse(
//!     "Package: hello\nVersion: 2.10\n\nPackage: world\nVersion: 1.0\n",
//! );
//! assert_eq!(doc.len(), 2);
//! let first = doc.iter().next().unwrap();
//! assert_eq!(first.get("Package"), Some("hello"));
//! ```
use indexmap::IndexMap;

#[cfg(feature = "derive")]
pub use control_derive::{FromControl, ToControl};

pub mod convert;
pub use convert::{FromControlParagraph, ToControlParagraph};
mod scanner;

/// Error type for the parser.
#[derive(Debug)]
pub enum Error {
    /// The input was not text.
    NotText(std::str::Utf8Error),

    /// Single-paragraph parse of input holding more than one paragraph.
    MultipleParagraphs,

    /// A paragraph was required but the input contained none.
    NoParagraph,

    /// IO error.
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::NotText(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::NotText(e) => write!(f, "Input is not text: {}", e),
            Self::MultipleParagraphs => f.write_str("Input contains more than one paragraph"),
            Self::NoParagraph => f.write_str("Input contains no paragraph"),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotText(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A paragraph: an ordered mapping from field names to values.
///
/// Names are case-sensitive and unique. Iteration yields fields in the
/// order their names first appeared; overwriting a value does not move
/// the field.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Paragraph {
    fields: IndexMap<String, String>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single paragraph.
    ///
    /// The input is trimmed first. Returns `Ok(None)` when no fields are
    /// recognized; input still containing a blank-line separator after
    /// the trim is rejected with [`Error::MultipleParagraphs`].
    pub fn parse(text: &str) -> Result<Option<Paragraph>, Error> {
        let text = text.trim();
        if text.contains("\n\n") {
            return Err(Error::MultipleParagraphs);
        }
        Ok(Self::from_block(text))
    }

    /// Parse a single paragraph from bytes.
    ///
    /// Fails with [`Error::NotText`] when the bytes are not UTF-8.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Option<Paragraph>, Error> {
        Self::parse(std::str::from_utf8(bytes)?)
    }

    /// Scan one block. Duplicate names keep their first position and
    /// their last value. No fields means no paragraph.
    fn from_block(block: &str) -> Option<Paragraph> {
        let mut fields = IndexMap::new();
        for field in scanner::scan_fields(block) {
            fields.insert(field.name.to_string(), field.value.to_string());
        }
        if fields.is_empty() {
            None
        } else {
            Some(Paragraph { fields })
        }
    }

    /// Get the value of a field by name.
    ///
    /// Returns `None` if the field does not exist.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Check whether a field with the given name exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Return the number of fields in the paragraph.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over the fields in the paragraph.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the fields in the paragraph, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.fields.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the field names, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Set the value of a field.
    ///
    /// An existing field keeps its position and gets the new value; a
    /// new field is appended at the end.
    pub fn set(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// Remove a field from the paragraph, returning its value.
    ///
    /// Later fields shift up so the remaining order is preserved.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.shift_remove(name)
    }
}

/// Write one field, reproducing fold indentation. Continuation lines
/// that already start with whitespace are kept verbatim; bare lines get
/// a single-space indent so they stay part of the field on reparse.
fn fmt_field(f: &mut std::fmt::Formatter, name: &str, value: &str) -> std::fmt::Result {
    if value.is_empty() {
        return writeln!(f, "{}:", name);
    }
    let mut lines = value.split('\n');
    writeln!(f, "{}: {}", name, lines.next().unwrap_or(""))?;
    for line in lines {
        if line.starts_with(|c: char| c.is_whitespace()) {
            writeln!(f, "{}", line)?;
        } else {
            writeln!(f, " {}", line)?;
        }
    }
    Ok(())
}

/// Serializes every field in order, one `Name: value` block per field.
///
/// Output reparses to an equal paragraph whenever the paragraph itself
/// came from the parser. Hand-set values can break that: an empty value
/// prints as `Name:` with nothing after the colon, and on reparse the
/// whitespace skip runs past the line break and merges the next field
/// line into this value.
impl std::fmt::Display for Paragraph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (name, value) in self.iter() {
            fmt_field(f, name, value)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Paragraph {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Paragraph::parse(s)?.ok_or(Error::NoParagraph)
    }
}

impl From<Vec<(String, String)>> for Paragraph {
    fn from(fields: Vec<(String, String)>) -> Self {
        fields.into_iter().collect()
    }
}

impl FromIterator<(String, String)> for Paragraph {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Paragraph {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Paragraph {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// A control file: an ordered sequence of paragraphs.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ControlFile(Vec<Paragraph>);

impl From<ControlFile> for Vec<Paragraph> {
    fn from(doc: ControlFile) -> Self {
        doc.0
    }
}

impl From<Vec<Paragraph>> for ControlFile {
    fn from(paragraphs: Vec<Paragraph>) -> Self {
        ControlFile(paragraphs)
    }
}

impl FromIterator<Paragraph> for ControlFile {
    fn from_iter<T: IntoIterator<Item = Paragraph>>(iter: T) -> Self {
        ControlFile(iter.into_iter().collect())
    }
}

impl IntoIterator for ControlFile {
    type Item = Paragraph;
    type IntoIter = std::vec::IntoIter<Paragraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl ControlFile {
    /// Parse a document.
    ///
    /// The input is trimmed, split into blocks on blank lines, and each
    /// block scanned for fields. Blocks yielding no fields are dropped,
    /// so the result holds no empty paragraphs. String input always
    /// parses; there is no error case.
    pub fn parse(text: &str) -> ControlFile {
        let text = text.trim();
        ControlFile(
            scanner::split_blocks(text)
                .into_iter()
                .filter_map(Paragraph::from_block)
                .collect(),
        )
    }

    /// Parse a document from bytes.
    ///
    /// Fails with [`Error::NotText`] when the bytes are not UTF-8.
    pub fn parse_bytes(bytes: &[u8]) -> Result<ControlFile, Error> {
        Ok(Self::parse(std::str::from_utf8(bytes)?))
    }

    /// Number of paragraphs in the document.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the paragraphs in the document.
    pub fn iter(&self) -> impl Iterator<Item = &Paragraph> {
        self.0.iter()
    }

    /// Iterate over the paragraphs in the document, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.0.iter_mut()
    }

    /// Read a whole document from a reader.
    pub fn from_reader<R: std::io::Read>(mut r: R) -> Result<Self, Error> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Self::parse_bytes(&buf)
    }

    /// Stream paragraphs from a reader.
    ///
    /// This returns an iterator that reads and parses paragraphs one at
    /// a time, which is more memory-efficient for large files.
    pub fn iter_paragraphs_from_reader<R: std::io::BufRead>(reader: R) -> ParagraphReader<R> {
        ParagraphReader::new(reader)
    }
}

impl std::fmt::Display for ControlFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, paragraph) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", paragraph)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ControlFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ControlFile::parse(s))
    }
}

/// Reader that streams paragraphs from a buffered reader.
///
/// Chunks are delimited by empty lines (a line that is only its own
/// terminator); within a chunk the usual grammar applies. Chunks that
/// yield no fields are skipped, so the iterator never produces an empty
/// paragraph.
pub struct ParagraphReader<R: std::io::BufRead> {
    reader: R,
    buffer: String,
    finished: bool,
}

impl<R: std::io::BufRead> ParagraphReader<R> {
    /// Create a new paragraph reader from a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            finished: false,
        }
    }
}

impl<R: std::io::BufRead> Iterator for ParagraphReader<R> {
    type Item = Result<Paragraph, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buffer.clear();
            loop {
                let mut line = String::new();
                match self.reader.read_line(&mut line) {
                    Ok(0) => {
                        self.finished = true;
                        break;
                    }
                    Ok(_) => {
                        let content = line.strip_suffix('\n').unwrap_or(&line);
                        if content.is_empty() {
                            if self.buffer.is_empty() {
                                continue;
                            }
                            break;
                        }
                        self.buffer.push_str(&line);
                    }
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(Error::Io(e)));
                    }
                }
            }
            // A chunk contains no blank line, so single-paragraph
            // parsing cannot see a separator.
            match Paragraph::parse(&self.buffer) {
                Ok(Some(paragraph)) => return Some(Ok(paragraph)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
