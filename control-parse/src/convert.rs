//! Conversion between control-file paragraphs and Rust objects.

/// Abstract trait for accessing and modifying key-value pairs in a paragraph.
pub trait ControlLikeParagraph: FromIterator<(String, String)> {
    /// Get the value for the given key.
    fn get(&self, key: &str) -> Option<String>;

    /// Insert a key-value pair.
    fn set(&mut self, key: &str, value: &str);

    /// Remove a key-value pair.
    fn remove(&mut self, key: &str);
}

impl ControlLikeParagraph for crate::Paragraph {
    fn get(&self, key: &str) -> Option<String> {
        crate::Paragraph::get(self, key).map(|v| v.to_string())
    }

    fn set(&mut self, key: &str, value: &str) {
        crate::Paragraph::set(self, key, value);
    }

    fn remove(&mut self, key: &str) {
        crate::Paragraph::remove(self, key);
    }
}

/// Convert a paragraph to this object.
pub trait FromControlParagraph<P: ControlLikeParagraph> {
    /// Convert a paragraph to this object.
    fn from_paragraph(paragraph: &P) -> Result<Self, String>
    where
        Self: Sized;
}

/// Convert this object to a paragraph.
pub trait ToControlParagraph<P: ControlLikeParagraph> {
    /// Convert this object to a paragraph.
    fn to_paragraph(&self) -> P;

    /// Update the given paragraph with the values from this object.
    fn update_paragraph(&self, paragraph: &mut P);
}

/// Format a value for a field that must stay on one line.
///
/// The derive macros call this for fields marked `single_line`.
///
/// # Panics
///
/// Panics if the value contains a newline.
pub fn format_single_line(field_name: &str, value: &str) -> String {
    if value.contains('\n') {
        panic!(
            "Field '{}' is marked as single_line but contains newlines",
            field_name
        );
    }
    value.to_string()
}

/// Format a value for a multi-line field: continuation lines get a
/// one-space indent and empty lines become the `.` placeholder.
pub fn format_multi_line(value: &str) -> String {
    let mut lines = value.split('\n');
    let mut out = String::new();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        if line.is_empty() {
            out.push_str(" .");
        } else {
            out.push(' ');
            out.push_str(line);
        }
    }
    out
}

/// Fold a value onto one line: lines are trimmed, empty ones dropped,
/// and the rest joined with single spaces.
pub fn format_folded(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
