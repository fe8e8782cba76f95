//! Hand-written scanner for the control-file grammar.
//!
//! The scanner works on byte offsets so that every value comes out as a
//! contiguous slice of the input. Structural bytes (field names, the
//! colon, line terminators) are all ASCII; whitespace tests decode a
//! full character because the grammar folds on any Unicode whitespace.

/// One recognized field, borrowed from the block being scanned.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RawField<'a> {
    pub(crate) name: &'a str,
    pub(crate) value: &'a str,
}

/// Field name characters: visible ASCII minus the colon.
fn is_name_byte(b: u8) -> bool {
    matches!(b, 0x21..=0x39 | 0x3B..=0x7E)
}

/// A name may not start with a comment marker or a dash, though both
/// are allowed in later positions.
fn is_name_start(b: u8) -> bool {
    is_name_byte(b) && b != b'#' && b != b'-'
}

/// Scan the fields of one paragraph block.
///
/// The block must not contain a blank-line separator; callers split on
/// those first.
pub(crate) fn scan_fields(block: &str) -> FieldScanner<'_> {
    FieldScanner { block, pos: 0 }
}

/// Iterator over the fields of a block.
///
/// A field starts only at the start of a physical line; any line that
/// does not start a field is skipped whole. Both `\n` and `\r` end a
/// physical line.
pub(crate) struct FieldScanner<'a> {
    block: &'a str,
    pos: usize,
}

impl<'a> FieldScanner<'a> {
    fn char_at(&self, pos: usize) -> Option<char> {
        self.block.get(pos..).and_then(|s| s.chars().next())
    }

    /// Advance past the rest of the current physical line, including one
    /// terminator byte. A `\r\n` pair takes two rounds, which is the
    /// same as treating each byte as its own terminator.
    fn skip_line(&mut self) {
        let bytes = self.block.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' && bytes[self.pos] != b'\r' {
            self.pos += 1;
        }
        if self.pos < bytes.len() {
            self.pos += 1;
        }
    }

    /// Scan a field name at the current position. Returns the exclusive
    /// end offset of the name when the line starts with a valid name
    /// followed immediately by a colon; whitespace before the colon
    /// disqualifies the line.
    fn scan_name(&self) -> Option<usize> {
        let bytes = self.block.as_bytes();
        if !is_name_start(*bytes.get(self.pos)?) {
            return None;
        }
        let mut end = self.pos + 1;
        while end < bytes.len() && is_name_byte(bytes[end]) {
            end += 1;
        }
        if bytes.get(end) == Some(&b':') {
            Some(end)
        } else {
            None
        }
    }

    /// Scan a value starting right after the colon.
    ///
    /// First skips a whitespace run, which may cross line breaks (so an
    /// empty-valued field swallows a following field into its value).
    /// The body then runs to the first line terminator that is not a
    /// fold: a `\n` directly followed by whitespace continues the value,
    /// with both characters kept verbatim. A `\r` always terminates.
    fn scan_value(&mut self, after_colon: usize) -> &'a str {
        let block = self.block;
        let bytes = block.as_bytes();
        let mut pos = after_colon;
        while let Some(c) = self.char_at(pos) {
            if !c.is_whitespace() {
                break;
            }
            pos += c.len_utf8();
        }
        let start = pos;
        loop {
            match bytes.get(pos) {
                None | Some(b'\r') => break,
                Some(b'\n') => match self.char_at(pos + 1) {
                    Some(c) if c.is_whitespace() => pos += 1 + c.len_utf8(),
                    _ => break,
                },
                Some(_) => match self.char_at(pos) {
                    Some(c) => pos += c.len_utf8(),
                    None => break,
                },
            }
        }
        self.pos = pos;
        &block[start..pos]
    }
}

impl<'a> Iterator for FieldScanner<'a> {
    type Item = RawField<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.block;
        while self.pos < block.len() {
            match self.scan_name() {
                Some(name_end) => {
                    let name = &block[self.pos..name_end];
                    let value = self.scan_value(name_end + 1);
                    return Some(RawField { name, value });
                }
                None => self.skip_line(),
            }
        }
        None
    }
}

/// Split trimmed input into paragraph blocks on runs of two or more
/// newlines. The final block is empty exactly when the input is.
pub(crate) fn split_blocks(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1) == Some(&b'\n') {
            blocks.push(&input[start..i]);
            i += 2;
            while bytes.get(i) == Some(&b'\n') {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    blocks.push(&input[start..]);
    blocks
}
