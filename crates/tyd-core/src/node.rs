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

//! The TyD document tree.
//!
//! A parsed document is an ordered sequence of records. Each record is a
//! [`Node`]: a string leaf, a table (children addressed by name), or a list
//! (positional, typically anonymous children). Tables and lists carry the
//! four inheritance attributes (`handle`, `source`, `abstract`, `noinherit`)
//! in [`RecordAttrs`].
//!
//! Collections own their children exclusively; the tree is a pure ownership
//! hierarchy with no back-pointers. Equality is structural on names, values,
//! children, and attributes; source positions never participate.

use crate::error::{TydError, TydResult};
use crate::lex::is_symbol_char;

/// The inheritance-related attributes a table or list may declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordAttrs {
    /// Unique identifier other records reference as a `source`.
    pub handle: Option<String>,
    /// The handle this record inherits from.
    pub source: Option<String>,
    /// Record exists only to be inherited from.
    pub is_abstract: bool,
    /// Blocks inheritance into this record.
    pub no_inherit: bool,
}

impl RecordAttrs {
    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.handle.is_none() && self.source.is_none() && !self.is_abstract && !self.no_inherit
    }
}

/// A string leaf.
///
/// `value == None` is the distinct null value, not the empty string.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringNode {
    /// Record name, absent for anonymous list items.
    pub name: Option<String>,
    /// The value; `None` is the null value.
    pub value: Option<String>,
    /// Source line (1-based, 0 when built programmatically).
    pub line: usize,
}

impl StringNode {
    /// Create a string node.
    pub fn new(name: Option<&str>, value: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            value: value.map(str::to_string),
            line: 0,
        }
    }
}

impl PartialEq for StringNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for StringNode {}

/// A table: an ordered collection whose children are addressed by name.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableNode {
    /// Record name, absent for anonymous records.
    pub name: Option<String>,
    /// Inheritance attributes.
    pub attrs: RecordAttrs,
    /// Ordered children; order is significant and preserved.
    pub children: Vec<Node>,
    /// Source line (1-based, 0 when built programmatically).
    pub line: usize,
}

impl TableNode {
    /// Create an empty table.
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            attrs: RecordAttrs::default(),
            children: Vec::new(),
            line: 0,
        }
    }

    /// Look up the first child with the given name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|n| n.name() == Some(name))
    }

    /// Mutable lookup of the first child with the given name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|n| n.name() == Some(name))
    }

    /// Append a child, taking ownership of it.
    pub fn add(&mut self, node: Node) -> TydResult<()> {
        check_child_name(&node)?;
        self.children.push(node);
        Ok(())
    }

    /// Insert a child at `index` (clamped to the current length).
    pub fn insert(&mut self, index: usize, node: Node) -> TydResult<()> {
        check_child_name(&node)?;
        let index = index.min(self.children.len());
        self.children.insert(index, node);
        Ok(())
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the table has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over the children in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }
}

impl PartialEq for TableNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.attrs == other.attrs && self.children == other.children
    }
}

impl Eq for TableNode {}

/// A list: an ordered collection of positional, typically anonymous children.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListNode {
    /// Record name, absent for anonymous records.
    pub name: Option<String>,
    /// Inheritance attributes.
    pub attrs: RecordAttrs,
    /// Ordered children; order is significant and preserved.
    pub children: Vec<Node>,
    /// Source line (1-based, 0 when built programmatically).
    pub line: usize,
}

impl ListNode {
    /// Create an empty list.
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            attrs: RecordAttrs::default(),
            children: Vec::new(),
            line: 0,
        }
    }

    /// Append a child, taking ownership of it.
    pub fn add(&mut self, node: Node) -> TydResult<()> {
        check_child_name(&node)?;
        self.children.push(node);
        Ok(())
    }

    /// Insert a child at `index` (clamped to the current length).
    pub fn insert(&mut self, index: usize, node: Node) -> TydResult<()> {
        check_child_name(&node)?;
        let index = index.min(self.children.len());
        self.children.insert(index, node);
        Ok(())
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the list has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over the children in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }
}

impl PartialEq for ListNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.attrs == other.attrs && self.children == other.children
    }
}

impl Eq for ListNode {}

/// A record in a TyD tree.
///
/// The variant set is closed: string leaf, table, list. There is no external
/// extension point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// A string leaf.
    String(StringNode),
    /// A table of named children.
    Table(TableNode),
    /// A list of positional children.
    List(ListNode),
}

impl Node {
    /// The record name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::String(s) => s.name.as_deref(),
            Self::Table(t) => t.name.as_deref(),
            Self::List(l) => l.name.as_deref(),
        }
    }

    /// The source line the record started on (0 when unknown).
    pub fn line(&self) -> usize {
        match self {
            Self::String(s) => s.line,
            Self::Table(t) => t.line,
            Self::List(l) => l.line,
        }
    }

    /// Inheritance attributes, for table and list records.
    pub fn attrs(&self) -> Option<&RecordAttrs> {
        match self {
            Self::String(_) => None,
            Self::Table(t) => Some(&t.attrs),
            Self::List(l) => Some(&l.attrs),
        }
    }

    /// Ordered children, for table and list records.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Self::String(_) => None,
            Self::Table(t) => Some(&t.children),
            Self::List(l) => Some(&l.children),
        }
    }

    /// Try to view as a string leaf.
    pub fn as_string(&self) -> Option<&StringNode> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view as a table.
    pub fn as_table(&self) -> Option<&TableNode> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Try to view as a list.
    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Try to view as a mutable table.
    pub fn as_table_mut(&mut self) -> Option<&mut TableNode> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Try to view as a mutable list.
    pub fn as_list_mut(&mut self) -> Option<&mut ListNode> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// True for table and list records.
    pub fn is_collection(&self) -> bool {
        !matches!(self, Self::String(_))
    }
}

impl From<StringNode> for Node {
    fn from(node: StringNode) -> Self {
        Self::String(node)
    }
}

impl From<TableNode> for Node {
    fn from(node: TableNode) -> Self {
        Self::Table(node)
    }
}

impl From<ListNode> for Node {
    fn from(node: ListNode) -> Self {
        Self::List(node)
    }
}

/// One parsed source unit: the ordered sequence of top-level records.
///
/// Behaves like an anonymous table with no parent. A slice of documents
/// forms a document set sharing one handle namespace for inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Top-level records in source order.
    pub children: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from an ordered sequence of records.
    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Look up the first top-level record with the given name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|n| n.name() == Some(name))
    }

    /// Append a top-level record.
    pub fn add(&mut self, node: Node) -> TydResult<()> {
        check_child_name(&node)?;
        self.children.push(node);
        Ok(())
    }

    /// Number of top-level records.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the document has no records.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over the top-level records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }
}

// The name invariant is enforced at the mutation seam: a name is either
// absent or a non-empty string over the symbol alphabet.
fn check_child_name(node: &Node) -> TydResult<()> {
    let Some(name) = node.name() else {
        return Ok(());
    };
    if name.is_empty() || !name.bytes().all(is_symbol_char) {
        return Err(TydError::structure(format!(
            "node name must be absent or a non-empty symbol, got '{name}'"
        )));
    }
    Ok(())
}
