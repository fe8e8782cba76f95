#![deny(missing_docs)]
//! Typed records for APT repository indices.
//!
//! This crate layers typed records over the control-format parser in
//! [`control_parse`]. A `Packages` index becomes a list of [`Package`]
//! records and a `Release` file becomes a [`Release`] record. Field
//! values stay opaque strings: versions, dependency relations and
//! checksums are carried as written, not interpreted.
//!
//! # Examples
//!
//! ```rust
//! use apt_index::Packages;
//!
//! let text = "Package: com.example.tool\nVersion: 1.2.0\nFilename: ./debs/tool_1.2.0.deb\n";
//! let packages: Packages = text.parse().unwrap();
//! assert_eq!(packages[0].version, "1.2.0");
//! ```

use std::collections::HashSet;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;

use control_parse::{
    ControlFile, FromControl, FromControlParagraph, Paragraph, ToControl, ToControlParagraph,
};
use url::Url;

pub mod error;
mod release;

pub use error::IndexError;
pub use release::Release;

/// A single entry of a `Packages` index.
///
/// Only the fields this crate acts on are named; everything is kept as
/// an opaque string. Unknown fields in the source paragraph are dropped
/// on conversion.
#[derive(FromControl, ToControl, Clone, PartialEq, Eq, Debug, Default)]
pub struct Package {
    /// Package identifier
    #[control(field = "Package")]
    pub package: String,
    /// Human-readable name, when the archive carries one
    #[control(field = "Name")]
    pub name: Option<String>,
    /// Version, as written
    #[control(field = "Version")]
    pub version: String,
    /// Target architecture
    #[control(field = "Architecture")]
    pub architecture: Option<String>,
    /// Archive section
    #[control(field = "Section")]
    pub section: Option<String>,
    /// Maintainer contact
    #[control(field = "Maintainer")]
    pub maintainer: Option<String>,
    /// Author contact
    #[control(field = "Author")]
    pub author: Option<String>,
    /// Dependency relations, uninterpreted
    #[control(field = "Depends")]
    pub depends: Option<String>,
    /// Path of the `.deb` relative to the archive root
    #[control(field = "Filename")]
    pub filename: String,
    /// Size of the `.deb` in bytes, as written
    #[control(field = "Size")]
    pub size: Option<String>,
    /// MD5 checksum, as written
    #[control(field = "MD5sum")]
    pub md5sum: Option<String>,
    /// SHA256 checksum, as written
    #[control(field = "SHA256")]
    pub sha256: Option<String>,
    /// Short description, with optional extended lines
    #[control(field = "Description")]
    pub description: Option<String>,
    /// Web depiction page advertised for this entry
    #[control(field = "Depiction")]
    pub depiction: Option<String>,
    /// Sileo-native depiction advertised for this entry
    #[control(field = "SileoDepiction")]
    pub sileo_depiction: Option<String>,
}

impl Package {
    /// The human-facing name: the `Name` field when present, otherwise
    /// the package identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.package)
    }

    /// Rewrite the leading portion of the pool path.
    ///
    /// Index generators write paths relative to their staging tree
    /// while the published index wants them relative to the archive
    /// root, e.g. `../debs/tool.deb` becomes `./debs/tool.deb`. Does
    /// nothing when the path does not start with `from`.
    pub fn rewrite_filename_prefix(&mut self, from: &str, to: &str) {
        if let Some(rest) = self.filename.strip_prefix(from) {
            self.filename = format!("{}{}", to, rest);
        }
    }
}

impl FromStr for Package {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let para: Paragraph = s.parse()?;
        Package::from_paragraph(&para).map_err(IndexError::Record)
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let para: Paragraph = self.to_paragraph();
        write!(f, "{}", para)
    }
}

/// Depiction URLs advertised alongside a package entry.
///
/// Archives serve a web page and a Sileo-native payload per package
/// under well-known paths below the repository base URL.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Depictions {
    /// Web depiction page
    pub web: Url,
    /// Sileo-native depiction payload
    pub sileo: Url,
}

impl Depictions {
    /// Build the depiction URLs for a package identifier.
    ///
    /// The paths are resolved relative to `base`, so the base should
    /// end with a slash to keep its final segment.
    pub fn for_package(base: &Url, package: &str) -> Result<Self, IndexError> {
        Ok(Depictions {
            web: base.join(&format!("depictions/web/{}", package))?,
            sileo: base.join(&format!("depictions/sileo/{}", package))?,
        })
    }

    /// Store the URLs in the entry's depiction fields.
    pub fn apply(&self, package: &mut Package) {
        package.depiction = Some(self.web.to_string());
        package.sileo_depiction = Some(self.sileo.to_string());
    }
}

/// The contents of a `Packages` index, in file order.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Packages(Vec<Package>);

impl Packages {
    /// Creates an empty index
    pub fn empty() -> Self {
        Packages(Vec::new())
    }

    /// Creates an index from a container of `Package` entries
    pub fn new<Container>(container: Container) -> Self
    where
        Container: Into<Vec<Package>>,
    {
        Packages(container.into())
    }

    /// Parse an index from raw bytes. The bytes must be UTF-8 text.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexError> {
        let file = ControlFile::parse_bytes(bytes)?;
        Self::from_control(&file)
    }

    /// Read and parse a `Packages` file from disk
    pub fn from_file(path: &Path) -> Result<Self, IndexError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    fn from_control(file: &ControlFile) -> Result<Self, IndexError> {
        let packages = file
            .iter()
            .map(Package::from_paragraph)
            .collect::<Result<Vec<Package>, String>>()
            .map_err(IndexError::Record)?;
        Ok(Packages(packages))
    }

    /// Append an entry
    pub fn push(&mut self, package: Package) {
        self.0.push(package);
    }

    /// Retain entries matching a predicate
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Package) -> bool,
    {
        self.0.retain(f);
    }

    /// Iterator over entries
    pub fn iter(&self) -> std::slice::Iter<'_, Package> {
        self.0.iter()
    }

    /// Mutable iterator over entries
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Package> {
        self.0.iter_mut()
    }

    /// Extend with an iterator of entries
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Package>,
    {
        self.0.extend(iter);
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries whose identifier has not been seen yet.
    ///
    /// The first occurrence of an identifier wins; later ones are
    /// skipped. The set is caller-owned so one set can be threaded
    /// through several indices to deduplicate across files.
    pub fn unique<'a>(
        &'a self,
        seen: &'a mut HashSet<String>,
    ) -> impl Iterator<Item = &'a Package> + 'a {
        self.0.iter().filter(move |p| seen.insert(p.package.clone()))
    }
}

impl FromStr for Packages {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_control(&ControlFile::parse(s))
    }
}

impl std::fmt::Display for Packages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = self
            .0
            .iter()
            .map(|p| {
                let para: Paragraph = p.to_paragraph();
                para.to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");
        f.write_str(&result)
    }
}

impl Deref for Packages {
    type Target = Vec<Package>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn sample(id: &str) -> Package {
        Package {
            package: id.to_string(),
            version: "1.0".to_string(),
            filename: format!("./debs/{}_1.0.deb", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_packages() {
        let text = indoc!(
            r#"
            Package: com.example.tweak
            Name: Example Tweak
            Version: 1.2.0
            Architecture: iphoneos-arm
            Maintainer: Jane Maintainer <jane@example.com>
            Depends: mobilesubstrate (>= 0.9.5000)
            Filename: ../debs/com.example.tweak_1.2.0_iphoneos-arm.deb
            Size: 51342
            Description: An example tweak
             Longer description over
             two lines.

            Package: com.example.other
            Version: 0.3.1
            Filename: ./debs/com.example.other_0.3.1_iphoneos-arm.deb
            "#
        );
        let packages: Packages = text.parse().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].package, "com.example.tweak");
        assert_eq!(packages[0].name.as_deref(), Some("Example Tweak"));
        assert_eq!(
            packages[0].depends.as_deref(),
            Some("mobilesubstrate (>= 0.9.5000)")
        );
        assert_eq!(
            packages[0].description.as_deref(),
            Some("An example tweak\n Longer description over\n two lines.")
        );
        assert_eq!(packages[1].package, "com.example.other");
        assert_eq!(packages[1].name, None);
    }

    #[test]
    fn test_parse_empty_input() {
        let packages: Packages = "".parse().unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let text = "Package: com.example.tweak\nVersion: 1.0\n";
        let err = text.parse::<Packages>().unwrap_err();
        assert!(matches!(err, IndexError::Record(ref m) if m == "missing field: Filename"));
    }

    #[test]
    fn test_package_from_str_single_paragraph_only() {
        let text = "Package: a.first\nVersion: 1.0\nFilename: ./debs/a.deb\n\nPackage: b.second\n";
        let err = text.parse::<Package>().unwrap_err();
        assert!(matches!(
            err,
            IndexError::Control(control_parse::Error::MultipleParagraphs)
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let text = indoc!(
            r#"
            Package: com.example.tweak
            Name: Example Tweak
            Version: 1.2.0
            Filename: ./debs/com.example.tweak_1.2.0_iphoneos-arm.deb
            Description: An example tweak
             with a longer line
            "#
        );
        let packages: Packages = text.parse().unwrap();
        assert_eq!(packages.to_string(), text);
    }

    #[test]
    fn test_folded_required_field_roundtrips() {
        // Continuation lines are legal in any field, including the
        // required ones. They must re-serialize verbatim, not panic.
        let text = indoc!(
            r#"
            Package: com.example.tweak
            Version: 1.0
             hotfix-2
            Filename: ./debs/com.example.tweak_1.0.deb
            "#
        );
        let packages: Packages = text.parse().unwrap();
        assert_eq!(packages[0].version, "1.0\n hotfix-2");
        assert_eq!(packages.to_string(), text);
    }

    #[test]
    fn test_display_blank_line_between_entries() {
        let text = indoc!(
            r#"
            Package: a.first
            Version: 1.0
            Filename: ./debs/a.deb

            Package: b.second
            Version: 2.0
            Filename: ./debs/b.deb
            "#
        );
        let packages: Packages = text.parse().unwrap();
        assert_eq!(packages.to_string(), text);
    }

    #[test]
    fn test_rewrite_filename_prefix() {
        let mut package = sample("com.example.tweak");
        package.filename = "../debs/com.example.tweak_1.0.deb".to_string();
        package.rewrite_filename_prefix("../debs/", "./debs/");
        assert_eq!(package.filename, "./debs/com.example.tweak_1.0.deb");

        // Already rebased paths are left alone
        package.rewrite_filename_prefix("../debs/", "./debs/");
        assert_eq!(package.filename, "./debs/com.example.tweak_1.0.deb");
    }

    #[test]
    fn test_unique_within_one_index() {
        let mut packages = Packages::empty();
        let mut duplicate = sample("com.shared.pkg");
        duplicate.version = "2.0".to_string();
        packages.push(sample("com.shared.pkg"));
        packages.push(sample("com.only.first"));
        packages.push(duplicate);

        let mut seen = HashSet::new();
        let kept: Vec<&Package> = packages.unique(&mut seen).collect();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].package, "com.shared.pkg");
        assert_eq!(kept[0].version, "1.0");
        assert_eq!(kept[1].package, "com.only.first");
    }

    #[test]
    fn test_unique_across_indices() {
        let first = Packages::new(vec![sample("com.shared.pkg"), sample("com.only.first")]);
        let second = Packages::new(vec![sample("com.shared.pkg"), sample("com.only.second")]);

        let mut seen = HashSet::new();
        let from_first: Vec<String> = first.unique(&mut seen).map(|p| p.package.clone()).collect();
        let from_second: Vec<String> = second
            .unique(&mut seen)
            .map(|p| p.package.clone())
            .collect();
        assert_eq!(from_first, vec!["com.shared.pkg", "com.only.first"]);
        assert_eq!(from_second, vec!["com.only.second"]);
    }

    #[test]
    fn test_display_name_falls_back_to_identifier() {
        let mut package = sample("com.example.tweak");
        assert_eq!(package.display_name(), "com.example.tweak");
        package.name = Some("Example Tweak".to_string());
        assert_eq!(package.display_name(), "Example Tweak");
    }

    #[test]
    fn test_depictions_for_package() {
        let base: Url = "https://repo.example.com/".parse().unwrap();
        let depictions = Depictions::for_package(&base, "com.example.tweak").unwrap();
        assert_eq!(
            depictions.web.as_str(),
            "https://repo.example.com/depictions/web/com.example.tweak"
        );
        assert_eq!(
            depictions.sileo.as_str(),
            "https://repo.example.com/depictions/sileo/com.example.tweak"
        );

        let mut package = sample("com.example.tweak");
        depictions.apply(&mut package);
        assert_eq!(
            package.depiction.as_deref(),
            Some("https://repo.example.com/depictions/web/com.example.tweak")
        );
        assert_eq!(
            package.sileo_depiction.as_deref(),
            Some("https://repo.example.com/depictions/sileo/com.example.tweak")
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Packages");
        std::fs::write(
            &path,
            "Package: com.example.tweak\nVersion: 1.0\nFilename: ./debs/a.deb\n",
        )
        .unwrap();

        let packages = Packages::from_file(&path).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].package, "com.example.tweak");
    }

    #[test]
    fn test_from_bytes_rejects_binary() {
        let err = Packages::from_bytes(&[0x50, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(
            err,
            IndexError::Control(control_parse::Error::NotText(_))
        ));
    }

    #[test]
    fn test_container_operations() {
        let mut packages = Packages::empty();
        assert!(packages.is_empty());

        packages.push(sample("com.example.a"));
        packages.extend(vec![sample("com.example.b"), sample("com.example.c")]);
        assert_eq!(packages.len(), 3);

        packages.retain(|p| p.package != "com.example.b");
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].package, "com.example.c");

        for package in packages.iter_mut() {
            package.rewrite_filename_prefix("./debs/", "./pool/");
        }
        assert_eq!(packages[0].filename, "./pool/com.example.a_1.0.deb");
    }
}
