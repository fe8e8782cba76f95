//! The `Release` paragraph describing a repository.

use std::path::Path;
use std::str::FromStr;

use control_parse::{FromControl, FromControlParagraph, Paragraph, ToControl, ToControlParagraph};

use crate::error::IndexError;

/// Repository metadata from a `Release` file.
///
/// A `Release` file holds exactly one paragraph. Checksums of the
/// index files are not modelled.
#[derive(FromControl, ToControl, Clone, PartialEq, Eq, Debug, Default)]
pub struct Release {
    /// Owner of the archive
    #[control(field = "Origin")]
    pub origin: Option<String>,
    /// Display label
    #[control(field = "Label")]
    pub label: Option<String>,
    /// Suite name such as `stable`
    #[control(field = "Suite")]
    pub suite: Option<String>,
    /// Archive version
    #[control(field = "Version")]
    pub version: Option<String>,
    /// Codename of the distribution
    #[control(field = "Codename")]
    pub codename: Option<String>,
    /// Architectures served by the archive
    #[control(
        field = "Architectures",
        deserialize_with = deserialize_string_chain,
        serialize_with = serialize_string_chain
    )]
    pub architectures: Vec<String>,
    /// Components served by the archive
    #[control(
        field = "Components",
        deserialize_with = deserialize_string_chain,
        serialize_with = serialize_string_chain
    )]
    pub components: Vec<String>,
    /// Free-form description
    #[control(field = "Description")]
    pub description: Option<String>,
    /// Date the index was generated, as written
    #[control(field = "Date")]
    pub date: Option<String>,
}

impl Release {
    /// Read a `Release` file from disk.
    pub fn from_file(path: &Path) -> Result<Self, IndexError> {
        let bytes = std::fs::read(path)?;
        let para =
            Paragraph::parse_bytes(&bytes)?.ok_or(control_parse::Error::NoParagraph)?;
        Release::from_paragraph(&para).map_err(IndexError::Record)
    }
}

impl FromStr for Release {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let para: Paragraph = s.parse()?;
        Release::from_paragraph(&para).map_err(IndexError::Record)
    }
}

impl std::fmt::Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let para: Paragraph = self.to_paragraph();
        write!(f, "{}", para)
    }
}

/// Split a whitespace-separated field value into its words.
fn deserialize_string_chain(text: &str) -> Result<Vec<String>, String> {
    Ok(text.split_whitespace().map(|x| x.to_string()).collect())
}

/// Join words back into a whitespace-separated field value.
fn serialize_string_chain(chain: &[String]) -> String {
    chain.join(" ")
}
