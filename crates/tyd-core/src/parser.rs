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

//! Recursive-descent parser for TyD source text.
//!
//! The parser is a single forward cursor over the input bytes. Between
//! records it skips "non-substance" text: whitespace, record terminators
//! (`;`), and comments (`#` to end of line). Each record is a name (unless
//! inside a list body), zero or more `*attribute` clauses, and a value:
//! a `{...}` table, a `[...]` list, or one of three string forms (quoted,
//! vertical `|` lines, or a naked literal).
//!
//! Errors are fatal: the first one aborts the whole parse, carrying a
//! 1-based line/column and a bounded source excerpt.
//!
//! ```
//! use tyd_core::parse;
//!
//! let doc = parse("Door { color red; locked false }").unwrap();
//! let door = doc.get("Door").unwrap().as_table().unwrap();
//! assert_eq!(
//!     door.get("color").unwrap().as_string().unwrap().value.as_deref(),
//!     Some("red"),
//! );
//! ```

use crate::error::{TydError, TydResult};
use crate::lex::{
    self, excerpt, is_symbol_char, is_whitespace, line_of, position_of, unescape,
};
use crate::node::{Document, ListNode, Node, RecordAttrs, StringNode, TableNode};

/// Parse a complete source unit into a [`Document`].
///
/// Equivalent to collecting a [`Parser`]; the first error aborts the parse
/// and no partial document is returned.
pub fn parse(text: &str) -> TydResult<Document> {
    let mut doc = Document::new();
    for node in Parser::new(text) {
        doc.children.push(node?);
    }
    Ok(doc)
}

/// A lazy sequence of top-level records.
///
/// Each record is fully parsed before it is yielded. The iterator consumes a
/// single forward cursor and is not restartable; after yielding an error it
/// is fused.
///
/// ```
/// use tyd_core::Parser;
///
/// let names: Vec<_> = Parser::new("a 1; b 2; c 3")
///     .map(|r| r.unwrap().name().unwrap().to_string())
///     .collect();
/// assert_eq!(names, vec!["a", "b", "c"]);
/// ```
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given source text.
    pub fn new(text: &'a str) -> Self {
        Self {
            cursor: Cursor::new(text),
            done: false,
        }
    }
}

impl Iterator for Parser<'_> {
    type Item = TydResult<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.cursor.skip_substance();
        match self.cursor.peek() {
            None => {
                self.done = true;
                None
            }
            Some(lex::TABLE_CLOSE_CHAR) | Some(lex::LIST_CLOSE_CHAR) => {
                self.done = true;
                Some(Err(self.cursor.syntax_error("unmatched closing bracket")))
            }
            Some(_) => {
                let result = parse_record(&mut self.cursor, true);
                if result.is_err() {
                    self.done = true;
                }
                Some(result)
            }
        }
    }
}

/// Forward cursor over the input bytes.
///
/// Offsets are byte positions; the grammar's structural characters are all
/// ASCII, so the cursor only ever stops on character boundaries.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) {
        self.pos += 1;
    }

    #[inline]
    fn line(&self) -> usize {
        line_of(self.text, self.pos)
    }

    /// True when the cursor sits on a line break (LF, or CR followed by LF).
    fn at_newline(&self) -> bool {
        match self.peek() {
            Some(b'\n') => true,
            Some(b'\r') => self.text.as_bytes().get(self.pos + 1) == Some(&b'\n'),
            _ => false,
        }
    }

    /// Consume one line break. Call only when [`Self::at_newline`] is true.
    fn bump_newline(&mut self) {
        if self.peek() == Some(b'\r') {
            self.bump();
        }
        self.bump();
    }

    /// Skip non-substance text: whitespace, record terminators, comments.
    fn skip_substance(&mut self) {
        while let Some(byte) = self.peek() {
            if is_whitespace(byte) || byte == lex::RECORD_END_CHAR {
                self.bump();
            } else if byte == lex::COMMENT_CHAR {
                // Comment runs to end of line, inclusive of the line break.
                while self.peek().is_some() && !self.at_newline() {
                    self.bump();
                }
                if self.at_newline() {
                    self.bump_newline();
                }
            } else {
                return;
            }
        }
    }

    /// Read a run of symbol characters; empty runs are a fatal error.
    fn read_symbol(&mut self, what: &str) -> TydResult<&'a str> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if !is_symbol_char(byte) {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(self.syntax_error(format!("expected {what}")));
        }
        Ok(&self.text[start..self.pos])
    }

    fn syntax_error(&self, message: impl Into<String>) -> TydError {
        let pos = position_of(self.text, self.pos);
        TydError::syntax(message, pos.line)
            .with_column(pos.column)
            .with_excerpt(excerpt(self.text, self.pos))
    }

    fn attribute_error(&self, message: impl Into<String>) -> TydError {
        let pos = position_of(self.text, self.pos);
        TydError::attribute(message, pos.line)
            .with_column(pos.column)
            .with_excerpt(excerpt(self.text, self.pos))
    }
}

/// Parse one record starting at the cursor's current substance position.
fn parse_record(cursor: &mut Cursor<'_>, expect_names: bool) -> TydResult<Node> {
    let name = if expect_names {
        Some(cursor.read_symbol("record name")?.to_string())
    } else {
        None
    };

    cursor.skip_substance();
    let attrs = parse_attributes(cursor)?;

    let line = cursor.line();
    match cursor.peek() {
        Some(lex::TABLE_OPEN_CHAR) => {
            cursor.bump();
            let children = parse_children(cursor, true, lex::TABLE_CLOSE_CHAR)?;
            Ok(Node::Table(TableNode {
                name,
                attrs,
                children,
                line,
            }))
        }
        Some(lex::LIST_OPEN_CHAR) => {
            cursor.bump();
            let children = parse_children(cursor, false, lex::LIST_CLOSE_CHAR)?;
            Ok(Node::List(ListNode {
                name,
                attrs,
                children,
                line,
            }))
        }
        Some(_) => {
            // String records never carry attributes; any parsed clauses
            // are dropped, matching the reference behavior.
            let value = parse_string_value(cursor)?;
            Ok(Node::String(StringNode { name, value, line }))
        }
        None => Err(cursor.syntax_error("expected a record value")),
    }
}

/// Parse zero or more `*attribute` clauses.
fn parse_attributes(cursor: &mut Cursor<'_>) -> TydResult<RecordAttrs> {
    let mut attrs = RecordAttrs::default();
    while cursor.peek() == Some(lex::ATTRIBUTE_CHAR) {
        cursor.bump();
        let name_pos = cursor.pos;
        let name = cursor.read_symbol("attribute name")?;
        match name {
            lex::ABSTRACT_ATTRIBUTE => attrs.is_abstract = true,
            lex::NO_INHERIT_ATTRIBUTE => attrs.no_inherit = true,
            lex::HANDLE_ATTRIBUTE => {
                cursor.skip_substance();
                attrs.handle = Some(cursor.read_symbol("attribute value")?.to_string());
            }
            lex::SOURCE_ATTRIBUTE => {
                cursor.skip_substance();
                attrs.source = Some(cursor.read_symbol("attribute value")?.to_string());
            }
            other => {
                cursor.pos = name_pos;
                return Err(cursor.attribute_error(format!("unknown attribute name '{other}'")));
            }
        }
        cursor.skip_substance();
    }
    Ok(attrs)
}

/// Parse sibling records until the closing bracket of the enclosing
/// collection, consuming the bracket.
fn parse_children(
    cursor: &mut Cursor<'_>,
    expect_names: bool,
    close: u8,
) -> TydResult<Vec<Node>> {
    let mut children = Vec::new();
    loop {
        cursor.skip_substance();
        match cursor.peek() {
            None => {
                return Err(cursor.syntax_error(format!(
                    "unterminated collection, expected '{}'",
                    close as char
                )));
            }
            Some(byte) if byte == lex::TABLE_CLOSE_CHAR || byte == lex::LIST_CLOSE_CHAR => {
                if byte != close {
                    return Err(cursor.syntax_error(format!("expected '{}'", close as char)));
                }
                cursor.bump();
                return Ok(children);
            }
            Some(_) => children.push(parse_record(cursor, expect_names)?),
        }
    }
}

/// Parse a string value in one of the three forms, selected by the first
/// character: quoted (`"`), vertical (`|`), or naked.
fn parse_string_value(cursor: &mut Cursor<'_>) -> TydResult<Option<String>> {
    match cursor.peek() {
        Some(lex::QUOTE_CHAR) => parse_quoted(cursor),
        Some(lex::VERTICAL_CHAR) => parse_vertical(cursor),
        _ => parse_naked(cursor),
    }
}

fn parse_quoted(cursor: &mut Cursor<'_>) -> TydResult<Option<String>> {
    let line = cursor.line();
    cursor.bump();
    let start = cursor.pos;
    loop {
        match cursor.peek() {
            None => {
                return Err(cursor.syntax_error("unterminated quoted string"));
            }
            Some(lex::QUOTE_CHAR) => break,
            Some(lex::ESCAPE_CHAR) => {
                // Skip the escaped character so an escaped quote or
                // backslash never terminates the scan.
                cursor.bump();
                if cursor.peek().is_some() {
                    cursor.bump();
                }
            }
            Some(_) => cursor.bump(),
        }
    }
    let raw = &cursor.text[start..cursor.pos];
    cursor.bump();
    Ok(Some(unescape(raw, line)?))
}

fn parse_vertical(cursor: &mut Cursor<'_>) -> TydResult<Option<String>> {
    let mut value = String::new();
    loop {
        cursor.bump();
        let start = cursor.pos;
        while cursor.peek().is_some() && !cursor.at_newline() {
            cursor.bump();
        }
        value.push_str(&cursor.text[start..cursor.pos]);

        cursor.skip_substance();
        if cursor.peek() == Some(lex::VERTICAL_CHAR) {
            value.push('\n');
        } else {
            return Ok(Some(value));
        }
    }
}

fn parse_naked(cursor: &mut Cursor<'_>) -> TydResult<Option<String>> {
    let line = cursor.line();
    let start = cursor.pos;
    while let Some(byte) = cursor.peek() {
        if cursor.at_newline() {
            break;
        }
        match byte {
            lex::ESCAPE_CHAR => {
                cursor.bump();
                // A backslash directly before a line break stays dangling
                // and fails escape resolution below.
                if cursor.peek().is_some() && !cursor.at_newline() {
                    cursor.bump();
                }
            }
            lex::RECORD_END_CHAR
            | lex::COMMENT_CHAR
            | lex::TABLE_CLOSE_CHAR
            | lex::LIST_CLOSE_CHAR => break,
            _ => cursor.bump(),
        }
    }

    let raw = cursor.text[start..cursor.pos].trim_end();
    if raw == lex::NULL_LITERAL {
        return Ok(None);
    }
    Ok(Some(unescape(raw, line)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TydErrorKind;

    fn string_value(doc: &Document, name: &str) -> Option<String> {
        doc.get(name).unwrap().as_string().unwrap().value.clone()
    }

    // ==================== Basic record tests ====================

    #[test]
    fn test_parse_empty_input() {
        let doc = parse("").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_whitespace_only() {
        let doc = parse("  \n\t \r\n ").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_naked_string() {
        let doc = parse("color red").unwrap();
        assert_eq!(string_value(&doc, "color").as_deref(), Some("red"));
    }

    #[test]
    fn test_parse_naked_string_spans_spaces() {
        let doc = parse("label hello brave world").unwrap();
        assert_eq!(
            string_value(&doc, "label").as_deref(),
            Some("hello brave world")
        );
    }

    #[test]
    fn test_parse_naked_trims_trailing_whitespace() {
        let doc = parse("a padded   ; b x").unwrap();
        assert_eq!(string_value(&doc, "a").as_deref(), Some("padded"));
    }

    #[test]
    fn test_parse_multiple_records_with_terminators() {
        let doc = parse("a 1; b 2; c 3;").unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(string_value(&doc, "b").as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_null_literal() {
        let doc = parse("x null").unwrap();
        assert_eq!(string_value(&doc, "x"), None);
    }

    #[test]
    fn test_parse_quoted_null_is_the_string() {
        let doc = parse("x \"null\"").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("null"));
    }

    #[test]
    fn test_parse_naked_null_must_match_exactly() {
        let doc = parse("x Null; y nullx").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("Null"));
        assert_eq!(string_value(&doc, "y").as_deref(), Some("nullx"));
    }

    // ==================== Quoted string tests ====================

    #[test]
    fn test_parse_quoted_string() {
        let doc = parse("x \"hello; world # {}\"").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("hello; world # {}"));
    }

    #[test]
    fn test_parse_quoted_empty() {
        let doc = parse("x \"\"").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some(""));
    }

    #[test]
    fn test_parse_quoted_escapes() {
        let doc = parse(r#"x "a\#b\"c""#).unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("a#b\"c"));
    }

    #[test]
    fn test_parse_quoted_ending_in_escaped_backslash() {
        let doc = parse(r#"x "a\\""#).unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("a\\"));
    }

    #[test]
    fn test_parse_quoted_spans_newlines() {
        let doc = parse("x \"a\nb\"").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_parse_quoted_unterminated() {
        let err = parse("x \"oops").unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Syntax);
        assert!(err.message.contains("unterminated quoted string"));
    }

    #[test]
    fn test_parse_invalid_escape_is_fatal() {
        let err = parse(r#"x "a\qb""#).unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Escape);
    }

    // ==================== Vertical string tests ====================

    #[test]
    fn test_parse_vertical_string() {
        let doc = parse("x |line one\n  |line two\n  |line three").unwrap();
        assert_eq!(
            string_value(&doc, "x").as_deref(),
            Some("line one\nline two\nline three")
        );
    }

    #[test]
    fn test_parse_vertical_single_line() {
        let doc = parse("x |only").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("only"));
    }

    #[test]
    fn test_parse_vertical_ends_at_unprefixed_line() {
        let doc = parse("x |one\n  |two\ny 3").unwrap();
        assert_eq!(string_value(&doc, "x").as_deref(), Some("one\ntwo"));
        assert_eq!(string_value(&doc, "y").as_deref(), Some("3"));
    }

    // ==================== Comment tests ====================

    #[test]
    fn test_parse_comments_skipped() {
        let doc = parse("# heading\na 1 # trailing\nb 2\n").unwrap();
        assert_eq!(string_value(&doc, "a").as_deref(), Some("1"));
        assert_eq!(string_value(&doc, "b").as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_comment_at_eof_without_newline() {
        let doc = parse("a 1\n# final").unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_parse_escaped_comment_char_in_naked_value() {
        let doc = parse(r"a one\#two").unwrap();
        assert_eq!(string_value(&doc, "a").as_deref(), Some("one#two"));
    }

    // ==================== Table and list tests ====================

    #[test]
    fn test_parse_table() {
        let doc = parse("Door { color red; locked false }").unwrap();
        let door = doc.get("Door").unwrap().as_table().unwrap();
        assert_eq!(door.len(), 2);
        assert_eq!(
            door.get("locked").unwrap().as_string().unwrap().value.as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_parse_nested_tables() {
        let doc = parse("a { b { c deep } }").unwrap();
        let a = doc.get("a").unwrap().as_table().unwrap();
        let b = a.get("b").unwrap().as_table().unwrap();
        let c = b.get("c").unwrap().as_string().unwrap();
        assert_eq!(c.value.as_deref(), Some("deep"));
    }

    #[test]
    fn test_parse_list_children_are_anonymous() {
        let doc = parse("items [ one; two; three ]").unwrap();
        let items = doc.get("items").unwrap().as_list().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.children.iter().all(|n| n.name().is_none()));
        assert_eq!(
            items.children[1].as_string().unwrap().value.as_deref(),
            Some("two")
        );
    }

    #[test]
    fn test_parse_list_of_tables() {
        let doc = parse("points [ { x 1; y 2 } { x 3; y 4 } ]").unwrap();
        let points = doc.get("points").unwrap().as_list().unwrap();
        assert_eq!(points.len(), 2);
        let second = points.children[1].as_table().unwrap();
        assert_eq!(
            second.get("x").unwrap().as_string().unwrap().value.as_deref(),
            Some("3")
        );
    }

    #[test]
    fn test_parse_empty_collections() {
        let doc = parse("t {}\nl []").unwrap();
        assert!(doc.get("t").unwrap().as_table().unwrap().is_empty());
        assert!(doc.get("l").unwrap().as_list().unwrap().is_empty());
    }

    #[test]
    fn test_parse_duplicate_names_allowed_by_parser() {
        // The parser accepts duplicates; the resolver rejects them.
        let doc = parse("t { x 1; x 2 }").unwrap();
        assert_eq!(doc.get("t").unwrap().as_table().unwrap().len(), 2);
    }

    // ==================== Attribute tests ====================

    #[test]
    fn test_parse_attributes() {
        let doc = parse("Base *handle animal *abstract { legs 4 }").unwrap();
        let base = doc.get("Base").unwrap().as_table().unwrap();
        assert_eq!(base.attrs.handle.as_deref(), Some("animal"));
        assert!(base.attrs.is_abstract);
        assert!(!base.attrs.no_inherit);
        assert!(base.attrs.source.is_none());
    }

    #[test]
    fn test_parse_source_and_noinherit() {
        let doc = parse("Dog *source animal *noinherit { }").unwrap();
        let dog = doc.get("Dog").unwrap().as_table().unwrap();
        assert_eq!(dog.attrs.source.as_deref(), Some("animal"));
        assert!(dog.attrs.no_inherit);
    }

    #[test]
    fn test_parse_attributes_on_list() {
        let doc = parse("items *handle stuff [ a; b ]").unwrap();
        let items = doc.get("items").unwrap().as_list().unwrap();
        assert_eq!(items.attrs.handle.as_deref(), Some("stuff"));
    }

    #[test]
    fn test_parse_unknown_attribute_is_fatal() {
        let err = parse("t *wibble x {}").unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Attribute);
        assert!(err.message.contains("wibble"));
    }

    #[test]
    fn test_parse_attribute_missing_value() {
        let err = parse("t *handle { }").unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Syntax);
        assert!(err.message.contains("attribute value"));
    }

    // ==================== Error reporting tests ====================

    #[test]
    fn test_parse_unterminated_table() {
        let err = parse("t { a 1").unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Syntax);
        assert!(err.message.contains("unterminated collection"));
    }

    #[test]
    fn test_parse_mismatched_brackets() {
        let err = parse("t { a 1 ]").unwrap_err();
        assert!(err.message.contains("expected '}'"));
    }

    #[test]
    fn test_parse_unmatched_closing_bracket_at_top_level() {
        let err = parse("}").unwrap_err();
        assert!(err.message.contains("unmatched closing bracket"));
    }

    #[test]
    fn test_parse_missing_record_name() {
        let err = parse("{ a 1 }").unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Syntax);
        assert!(err.message.contains("record name"));
    }

    #[test]
    fn test_parse_error_carries_position_and_excerpt() {
        let err = parse("a 1\nb 2\nc {").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.column.is_some());
        assert!(err.excerpt.as_deref().unwrap().contains("[ERROR]"));
    }

    #[test]
    fn test_parse_dangling_backslash_in_naked_value() {
        let err = parse("a oops\\\nb 1").unwrap_err();
        assert_eq!(err.kind, TydErrorKind::Escape);
    }

    // ==================== Position tests ====================

    #[test]
    fn test_parsed_nodes_carry_source_lines() {
        let doc = parse("a 1\nt {\n    b 2\n}").unwrap();
        assert_eq!(doc.get("a").unwrap().line(), 1);
        let t = doc.get("t").unwrap();
        assert_eq!(t.line(), 2);
        assert_eq!(t.as_table().unwrap().get("b").unwrap().line(), 3);
    }

    #[test]
    fn test_parse_crlf_input() {
        let doc = parse("a 1\r\nt {\r\n    b 2\r\n}\r\n").unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("t").unwrap().as_table().unwrap().get("b").unwrap().line(), 3);
    }

    // ==================== Lazy iterator tests ====================

    #[test]
    fn test_parser_iterator_yields_records_in_order() {
        let mut parser = Parser::new("a 1; b 2");
        assert_eq!(parser.next().unwrap().unwrap().name(), Some("a"));
        assert_eq!(parser.next().unwrap().unwrap().name(), Some("b"));
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_parser_iterator_fused_after_error() {
        let mut parser = Parser::new("a 1; *bad");
        assert!(parser.next().unwrap().is_ok());
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }
}
