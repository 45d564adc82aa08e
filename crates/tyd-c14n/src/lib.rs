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

//! Canonical writer for TyD.
//!
//! Turns a node tree back into source text with 4-space indentation and
//! deterministic quoting. With the default [`WriteConfig`] the writer and
//! the parser are round-trip consistent:
//!
//! - `parse(write(tree)) == tree` for every tree the parser can produce;
//! - `write(parse(write(tree))) == write(tree)`: the canonical form is a
//!   fixed point.
//!
//! ```
//! use tyd_c14n::write_document;
//! use tyd_core::parse;
//!
//! let doc = parse("Door{color red;locked false}").unwrap();
//! let text = write_document(&doc);
//! assert_eq!(text, "Door\n{\n    color red\n    locked false\n}\n\n");
//! assert_eq!(parse(&text).unwrap(), doc);
//! ```

mod config;
mod writer;

pub use config::{WriteConfig, DEFAULT_INDENT_WIDTH, DEFAULT_QUOTE_THRESHOLD};
pub use writer::Writer;

use tyd_core::{Document, Node};

/// Render one record and its descendants in canonical form.
pub fn write(node: &Node) -> String {
    write_with_config(node, &WriteConfig::default())
}

/// Render one record with a custom configuration.
pub fn write_with_config(node: &Node, config: &WriteConfig) -> String {
    Writer::new(config.clone()).write_node(node, 0)
}

/// Render a whole document in canonical form.
pub fn write_document(doc: &Document) -> String {
    write_document_with_config(doc, &WriteConfig::default())
}

/// Render a whole document with a custom configuration.
pub fn write_document_with_config(doc: &Document, config: &WriteConfig) -> String {
    Writer::new(config.clone()).write_document(doc)
}
