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

//! Canonical TyD writer.
//!
//! Serializes a node tree back to source text. The output is a fixed point
//! of write → parse → write, and parsing the output of [`Writer::write_node`]
//! yields a tree structurally equal to the input for every tree the parser
//! can produce.
//!
//! String values are written naked when they can be read back verbatim:
//! short, not ending in `.`, free of structural characters, and not
//! colliding with the `null` literal or a string-form marker. Everything
//! else is quoted, with `\`, `"` and `#` escaped.

use crate::config::WriteConfig;
use tyd_core::lex::{self, escape_quoted};
use tyd_core::{Document, Node, RecordAttrs, StringNode};

/// Initial output buffer capacity; most records fit well within this.
const INITIAL_OUTPUT_BUFFER_CAPACITY: usize = 4096;

/// Characters a naked value may never contain.
const MUST_QUOTE_CHARS: [char; 10] = [
    lex::QUOTE_CHAR as char,
    '\n',
    '\t',
    lex::COMMENT_CHAR as char,
    lex::RECORD_END_CHAR as char,
    lex::ATTRIBUTE_CHAR as char,
    lex::TABLE_OPEN_CHAR as char,
    lex::TABLE_CLOSE_CHAR as char,
    lex::LIST_OPEN_CHAR as char,
    lex::LIST_CLOSE_CHAR as char,
];

/// Writer for canonical TyD output.
pub struct Writer {
    config: WriteConfig,
    output: String,
}

impl Writer {
    /// Creates a writer with the given configuration.
    pub fn new(config: WriteConfig) -> Self {
        Self {
            config,
            output: String::with_capacity(INITIAL_OUTPUT_BUFFER_CAPACITY),
        }
    }

    /// Render one record and all its descendants at the given indent level.
    ///
    /// Collection renderings end with a line break; string renderings do
    /// not.
    pub fn write_node(&mut self, node: &Node, indent: usize) -> String {
        self.output.clear();
        self.emit_node(node, indent);
        std::mem::take(&mut self.output)
    }

    /// Render a document: each top-level record at indent 0, followed by a
    /// line break.
    pub fn write_document(&mut self, doc: &Document) -> String {
        let mut out = String::with_capacity(INITIAL_OUTPUT_BUFFER_CAPACITY);
        for node in doc.iter() {
            out.push_str(&self.write_node(node, 0));
            out.push('\n');
        }
        out
    }

    fn emit_node(&mut self, node: &Node, indent: usize) {
        match node {
            Node::String(string) => self.emit_string(string, indent),
            Node::Table(table) => self.emit_collection(
                table.name.as_deref(),
                &table.attrs,
                &table.children,
                lex::TABLE_OPEN_CHAR as char,
                lex::TABLE_CLOSE_CHAR as char,
                indent,
            ),
            Node::List(list) => self.emit_collection(
                list.name.as_deref(),
                &list.attrs,
                &list.children,
                lex::LIST_OPEN_CHAR as char,
                lex::LIST_CLOSE_CHAR as char,
                indent,
            ),
        }
    }

    fn emit_string(&mut self, string: &StringNode, indent: usize) {
        self.emit_indent(indent);
        if let Some(name) = &string.name {
            self.output.push_str(name);
            self.output.push(' ');
        }
        let content = string_content(string.value.as_deref(), self.config.quote_threshold);
        self.output.push_str(&content);
    }

    fn emit_collection(
        &mut self,
        name: Option<&str>,
        attrs: &RecordAttrs,
        children: &[Node],
        open: char,
        close: char,
        indent: usize,
    ) {
        let has_intro = self.emit_intro(name, attrs, indent);

        if children.is_empty() {
            if !has_intro {
                self.emit_indent(indent);
            }
            self.output.push(open);
            self.output.push(close);
            self.output.push('\n');
            return;
        }

        if has_intro {
            self.output.push('\n');
        }
        self.emit_indent(indent);
        self.output.push(open);
        self.output.push('\n');
        for child in children {
            self.emit_node(child, indent + 1);
            self.output.push('\n');
        }
        self.emit_indent(indent);
        self.output.push(close);
        self.output.push('\n');
    }

    /// Emit the intro fragment: name and attributes, space separated, in
    /// the fixed order name, `*abstract`, `*noinherit`, `*handle`,
    /// `*source`. Returns whether anything was written.
    fn emit_intro(&mut self, name: Option<&str>, attrs: &RecordAttrs, indent: usize) -> bool {
        let mut fragments: Vec<String> = Vec::new();
        if let Some(name) = name {
            fragments.push(name.to_string());
        }
        if attrs.is_abstract {
            fragments.push(format!("*{}", lex::ABSTRACT_ATTRIBUTE));
        }
        if attrs.no_inherit {
            fragments.push(format!("*{}", lex::NO_INHERIT_ATTRIBUTE));
        }
        if let Some(handle) = &attrs.handle {
            fragments.push(format!("*{} {}", lex::HANDLE_ATTRIBUTE, handle));
        }
        if let Some(source) = &attrs.source {
            fragments.push(format!("*{} {}", lex::SOURCE_ATTRIBUTE, source));
        }

        if fragments.is_empty() {
            return false;
        }
        self.emit_indent(indent);
        self.output.push_str(&fragments.join(" "));
        true
    }

    fn emit_indent(&mut self, indent: usize) {
        for _ in 0..indent * self.config.indent_width {
            self.output.push(' ');
        }
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(WriteConfig::default())
    }
}

/// The textual form of a string value.
fn string_content(value: Option<&str>, threshold: usize) -> String {
    let Some(value) = value else {
        return lex::NULL_LITERAL.to_string();
    };
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if should_quote(value, threshold) {
        format!("\"{}\"", escape_quoted(value))
    } else {
        value.to_string()
    }
}

/// Whether a value needs the quoted form to be read back verbatim.
fn should_quote(value: &str, threshold: usize) -> bool {
    if value.chars().count() > threshold {
        return true;
    }
    if value.ends_with('.') {
        return true;
    }
    // A naked `null` would read back as the null value, and a leading
    // quote or pipe would select the wrong string form.
    if value == lex::NULL_LITERAL {
        return true;
    }
    let first = value.chars().next().unwrap_or(' ');
    let last = value.chars().next_back().unwrap_or(' ');
    if first == '"' || first == '|' || first.is_whitespace() || last.is_whitespace() {
        return true;
    }
    // Naked values pass through escape resolution on the way back in.
    if value.contains('\\') {
        return true;
    }
    value.contains(&MUST_QUOTE_CHARS[..])
}
