// TyD - a tidy, hierarchical, human-editable data language
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lexical helpers for TyD.
//!
//! Grammar characters, symbol classification, escape-sequence resolution,
//! and byte-offset to line/column conversion for error reporting. The
//! grammar characters are exact and not negotiable for compatibility.

use crate::error::{TydError, TydResult};
use memchr::{memchr_iter, memrchr};
use std::fmt;

/// Comment marker; a comment runs to the end of the line.
pub const COMMENT_CHAR: u8 = b'#';
/// Record terminator, skipped as non-substance between records.
pub const RECORD_END_CHAR: u8 = b';';
/// Attribute clause marker.
pub const ATTRIBUTE_CHAR: u8 = b'*';
/// Table open bracket.
pub const TABLE_OPEN_CHAR: u8 = b'{';
/// Table close bracket.
pub const TABLE_CLOSE_CHAR: u8 = b'}';
/// List open bracket.
pub const LIST_OPEN_CHAR: u8 = b'[';
/// List close bracket.
pub const LIST_CLOSE_CHAR: u8 = b']';
/// Quoted string delimiter.
pub const QUOTE_CHAR: u8 = b'"';
/// Vertical (multi-line) string marker.
pub const VERTICAL_CHAR: u8 = b'|';
/// Escape introducer inside string values.
pub const ESCAPE_CHAR: u8 = b'\\';

/// Attribute naming a record's unique handle.
pub const HANDLE_ATTRIBUTE: &str = "handle";
/// Attribute naming the handle a record inherits from.
pub const SOURCE_ATTRIBUTE: &str = "source";
/// Flag attribute marking an inheritance-only record.
pub const ABSTRACT_ATTRIBUTE: &str = "abstract";
/// Flag attribute blocking inheritance into a record.
pub const NO_INHERIT_ATTRIBUTE: &str = "noinherit";

/// Bare literal parsed as the null value (case-sensitive).
pub const NULL_LITERAL: &str = "null";

/// Number of context characters kept on each side of an error excerpt.
const EXCERPT_RANGE: usize = 500;

/// True for the symbol alphabet: ASCII letters, digits, `_`, `-`.
#[inline]
pub fn is_symbol_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// True for whitespace as the grammar understands it.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    byte.is_ascii_whitespace()
}

/// A position in source text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePos {
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, counted in characters).
    pub column: usize,
}

impl SourcePos {
    /// Creates a new source position.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.column)
    }
}

/// Line number (1-based) of a byte offset.
///
/// A line break is LF, or CR immediately followed by LF; lone CR is not a
/// break. Counting LF bytes covers both forms.
pub fn line_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    memchr_iter(b'\n', &text.as_bytes()[..offset]).count() + 1
}

/// Line and column (both 1-based) of a byte offset.
pub fn position_of(text: &str, offset: usize) -> SourcePos {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let line = line_of(text, offset);
    let line_start = memrchr(b'\n', &text.as_bytes()[..offset]).map_or(0, |p| p + 1);
    let column = text[line_start..offset].chars().count() + 1;
    SourcePos::new(line, column)
}

/// Bounded excerpt of the source around a failure offset.
///
/// Keeps roughly [`EXCERPT_RANGE`] characters on each side and inserts an
/// `[ERROR]` marker at the failure offset.
pub fn excerpt(text: &str, offset: usize) -> String {
    let mut at = offset.min(text.len());
    while !text.is_char_boundary(at) {
        at -= 1;
    }

    let mut start = at.saturating_sub(EXCERPT_RANGE);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (at + EXCERPT_RANGE).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }

    format!("{}[ERROR]{}", &text[start..at], &text[at..end])
}

fn escaped_char_of(ch: char) -> Option<char> {
    match ch {
        '\\' => Some('\\'),
        '"' => Some('"'),
        '#' => Some('#'),
        ';' => Some(';'),
        ']' => Some(']'),
        '}' => Some('}'),
        'r' => Some('\r'),
        'n' => Some('\n'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Resolve backslash escapes in a raw string value.
///
/// `line` is used for error positions; the whole parse aborts on an invalid
/// escape or a dangling trailing backslash.
pub fn unescape(raw: &str, line: usize) -> TydResult<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            return Err(TydError::escape(
                format!("string value ends with a single backslash: {raw}"),
                line,
            ));
        };
        let Some(resolved) = escaped_char_of(next) else {
            return Err(TydError::escape(format!("cannot escape char: \\{next}"), line));
        };
        out.push(resolved);
    }
    Ok(out)
}

/// Escape a value for emission inside a quoted string.
///
/// Backslash, quote, and the comment marker are the only characters that
/// need escaping inside quotes; everything else passes through raw.
pub fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '#' => out.push_str("\\#"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Classification tests ====================

    #[test]
    fn test_symbol_chars() {
        for b in [b'a', b'Z', b'0', b'9', b'_', b'-'] {
            assert!(is_symbol_char(b), "{}", b as char);
        }
        for b in [b' ', b'*', b'{', b'"', b'#', b';', b'.'] {
            assert!(!is_symbol_char(b), "{}", b as char);
        }
    }

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace(b' '));
        assert!(is_whitespace(b'\t'));
        assert!(is_whitespace(b'\n'));
        assert!(is_whitespace(b'\r'));
        assert!(!is_whitespace(b'x'));
    }

    // ==================== Position tests ====================

    #[test]
    fn test_line_of_lf() {
        let text = "a\nbb\nccc";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 2), 2);
        assert_eq!(line_of(text, 5), 3);
    }

    #[test]
    fn test_line_of_crlf_counts_once() {
        let text = "a\r\nb";
        assert_eq!(line_of(text, 3), 2);
    }

    #[test]
    fn test_line_of_lone_cr_is_not_a_break() {
        let text = "a\rb";
        assert_eq!(line_of(text, 2), 1);
    }

    #[test]
    fn test_position_of() {
        let text = "ab\ncde";
        assert_eq!(position_of(text, 0), SourcePos::new(1, 1));
        assert_eq!(position_of(text, 1), SourcePos::new(1, 2));
        assert_eq!(position_of(text, 3), SourcePos::new(2, 1));
        assert_eq!(position_of(text, 5), SourcePos::new(2, 3));
    }

    #[test]
    fn test_position_of_counts_chars_not_bytes() {
        let text = "héllo";
        assert_eq!(position_of(text, text.len()).column, 6);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(SourcePos::new(3, 7).to_string(), "line 3, col 7");
    }

    // ==================== Excerpt tests ====================

    #[test]
    fn test_excerpt_inserts_marker() {
        assert_eq!(excerpt("abcdef", 3), "abc[ERROR]def");
    }

    #[test]
    fn test_excerpt_at_end_of_input() {
        assert_eq!(excerpt("abc", 3), "abc[ERROR]");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let text = "x".repeat(3000);
        let ex = excerpt(&text, 1500);
        assert_eq!(ex.len(), 1000 + "[ERROR]".len());
    }

    // ==================== Escape tests ====================

    #[test]
    fn test_unescape_table() {
        assert_eq!(unescape(r"a\\b", 1).unwrap(), r"a\b");
        assert_eq!(unescape(r#"a\"b"#, 1).unwrap(), "a\"b");
        assert_eq!(unescape(r"a\#b", 1).unwrap(), "a#b");
        assert_eq!(unescape(r"a\;b", 1).unwrap(), "a;b");
        assert_eq!(unescape(r"a\]b", 1).unwrap(), "a]b");
        assert_eq!(unescape(r"a\}b", 1).unwrap(), "a}b");
        assert_eq!(unescape(r"a\rb", 1).unwrap(), "a\rb");
        assert_eq!(unescape(r"a\nb", 1).unwrap(), "a\nb");
        assert_eq!(unescape(r"a\tb", 1).unwrap(), "a\tb");
    }

    #[test]
    fn test_unescape_no_escapes_is_identity() {
        assert_eq!(unescape("plain", 1).unwrap(), "plain");
    }

    #[test]
    fn test_unescape_invalid_escape() {
        let err = unescape(r"a\qb", 4).unwrap_err();
        assert_eq!(err.kind, crate::TydErrorKind::Escape);
        assert_eq!(err.line, 4);
        assert!(err.message.contains("\\q"));
    }

    #[test]
    fn test_unescape_dangling_backslash() {
        let err = unescape("abc\\", 2).unwrap_err();
        assert_eq!(err.kind, crate::TydErrorKind::Escape);
        assert!(err.message.contains("single backslash"));
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted(r#"a#b"c\d"#), r#"a\#b\"c\\d"#);
        assert_eq!(escape_quoted("plain"), "plain");
    }

    #[test]
    fn test_escape_quoted_roundtrips_through_unescape() {
        let value = "a\\b\"c#d";
        assert_eq!(unescape(&escape_quoted(value), 1).unwrap(), value);
    }
}
