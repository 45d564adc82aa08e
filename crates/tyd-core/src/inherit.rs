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

//! Inheritance resolution across a document set.
//!
//! A top-level table or list may declare a `handle` (a unique identifier
//! other records can inherit from) and/or a `source` (the handle it inherits
//! from). The resolver links every heir to its source across the whole
//! document set, orders them so sources are resolved strictly before their
//! heirs, and applies field-level overriding:
//!
//! - a string source merges nothing;
//! - a table source recursively merges same-named children and inserts its
//!   remaining children ahead of the heir's own, in source order;
//! - a list source prepends all of its items, in source order;
//! - an heir declaring `noinherit` keeps exactly its own children.
//!
//! A [`Resolver`] is a plain value with a strict lifecycle: construct,
//! register every document of the scope, resolve once, discard. It is never
//! shared between resolution runs.
//!
//! ```
//! use tyd_core::{parse, resolve_document};
//!
//! let mut doc = parse(
//!     "Base *handle base { speed 10; legs 4 }\n\
//!      Dog *source base { speed 40 }",
//! )
//! .unwrap();
//! resolve_document(&mut doc).unwrap();
//!
//! let dog = doc.get("Dog").unwrap().as_table().unwrap();
//! let names: Vec<_> = dog.iter().map(|n| n.name().unwrap()).collect();
//! assert_eq!(names, vec!["legs", "speed"]);
//! ```

use crate::error::{TydError, TydResult};
use crate::node::{Document, Node};
use std::collections::{HashMap, HashSet, VecDeque};

/// One registered record: a top-level collection declaring a handle and/or
/// a source. Records declaring neither are ordinary data and never enter
/// the registry.
#[derive(Debug)]
struct Entry {
    /// Index of the owning document in the resolution scope.
    doc: usize,
    /// Child index within that document.
    index: usize,
    /// Declared handle, if any.
    handle: Option<String>,
    /// Declared source handle, if any.
    source: Option<String>,
    /// Record name, for error messages.
    name: Option<String>,
    /// Entry index of the linked source, filled during linking.
    source_entry: Option<usize>,
    /// Entry indices of records inheriting from this one.
    heirs: Vec<usize>,
}

impl Entry {
    fn describe(&self) -> String {
        match (&self.name, &self.handle) {
            (Some(name), _) => format!("'{name}'"),
            (None, Some(handle)) => format!("handle '{handle}'"),
            (None, None) => "anonymous record".to_string(),
        }
    }
}

/// State for one inheritance resolution run.
///
/// Holds the registry of participating records and the handle index.
/// Construct with [`Resolver::new`], feed every document of the scope to
/// [`Resolver::register_roots`] in the same order they will be passed to
/// [`Resolver::resolve`], then resolve. Resolution consumes the resolver;
/// after an error the run is aborted and nothing may be reused.
#[derive(Debug, Default)]
pub struct Resolver {
    entries: Vec<Entry>,
    by_handle: HashMap<String, usize>,
    docs_registered: usize,
}

impl Resolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document's top-level records.
    ///
    /// Only table and list records declaring `handle` or `source`
    /// participate; everything else is ordinary data. Declaring a handle
    /// that collides with an already-registered one is fatal.
    pub fn register_roots(&mut self, doc: &Document) -> TydResult<()> {
        let doc_index = self.docs_registered;
        self.docs_registered += 1;

        for (index, node) in doc.iter().enumerate() {
            let Some(attrs) = node.attrs() else {
                continue;
            };
            if attrs.handle.is_none() && attrs.source.is_none() {
                continue;
            }

            let entry_index = self.entries.len();
            if let Some(handle) = &attrs.handle {
                if self.by_handle.contains_key(handle) {
                    return Err(TydError::handle(format!("duplicate handle '{handle}'")));
                }
                self.by_handle.insert(handle.clone(), entry_index);
            }
            self.entries.push(Entry {
                doc: doc_index,
                index,
                handle: attrs.handle.clone(),
                source: attrs.source.clone(),
                name: node.name().map(str::to_string),
                source_entry: None,
                heirs: Vec::new(),
            });
        }
        Ok(())
    }

    /// Resolve the registered scope, mutating heirs in place.
    ///
    /// `docs` must be the same documents registered via
    /// [`Resolver::register_roots`], in the same order.
    pub fn resolve(mut self, docs: &mut [Document]) -> TydResult<()> {
        if self.docs_registered != docs.len() {
            return Err(TydError::structure(format!(
                "resolver registered {} documents but was given {}",
                self.docs_registered,
                docs.len()
            )));
        }

        self.link()?;
        let order = self.resolution_order()?;
        self.apply(docs, &order)
    }

    /// Link every heir to the entry owning the handle it names.
    fn link(&mut self) -> TydResult<()> {
        for index in 0..self.entries.len() {
            let Some(source) = self.entries[index].source.clone() else {
                continue;
            };
            let Some(&source_index) = self.by_handle.get(&source) else {
                return Err(TydError::source(format!(
                    "unresolved source handle '{}' (required by {})",
                    source,
                    self.entries[index].describe()
                )));
            };
            self.entries[index].source_entry = Some(source_index);
            self.entries[source_index].heirs.push(index);
        }
        Ok(())
    }

    /// Topological order: sources strictly before their heirs.
    ///
    /// Every entry has at most one source, so an entry becomes ready as
    /// soon as its source has been ordered. Entries left over after the
    /// walk sit on a cycle.
    fn resolution_order(&self) -> TydResult<Vec<usize>> {
        let mut order = Vec::with_capacity(self.entries.len());
        let mut resolved = vec![false; self.entries.len()];
        let mut ready: VecDeque<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source_entry.is_none())
            .map(|(i, _)| i)
            .collect();

        while let Some(index) = ready.pop_front() {
            resolved[index] = true;
            order.push(index);
            for &heir in &self.entries[index].heirs {
                if !resolved[heir] {
                    ready.push_back(heir);
                }
            }
        }

        if order.len() != self.entries.len() {
            let stuck = self
                .entries
                .iter()
                .enumerate()
                .find(|(i, _)| !resolved[*i])
                .map(|(_, e)| e.describe())
                .unwrap_or_default();
            return Err(TydError::inheritance(format!(
                "unresolvable inheritance chain involving {stuck} (cycle or inconsistent links)"
            )));
        }
        Ok(order)
    }

    /// Merge sources into heirs in resolution order.
    fn apply(&self, docs: &mut [Document], order: &[usize]) -> TydResult<()> {
        for &index in order {
            let entry = &self.entries[index];

            // Guard the original document before anything is merged in.
            if let Some(table) = docs[entry.doc].children[entry.index].as_table() {
                check_duplicate_names(&table.children)?;
            }

            let Some(source_index) = entry.source_entry else {
                continue;
            };
            let source_entry = &self.entries[source_index];
            // The source is fully resolved by now; a structural copy is
            // what the merge inserts anyway.
            let source = docs[source_entry.doc].children[source_entry.index].clone();
            let heir = &mut docs[entry.doc].children[entry.index];
            apply_inheritance(&source, heir)?;
        }
        Ok(())
    }
}

/// Resolve inheritance across an ordered document set sharing one handle
/// namespace.
pub fn resolve(docs: &mut [Document]) -> TydResult<()> {
    let mut resolver = Resolver::new();
    for doc in docs.iter() {
        resolver.register_roots(doc)?;
    }
    resolver.resolve(docs)
}

/// Resolve inheritance within a single document.
pub fn resolve_document(doc: &mut Document) -> TydResult<()> {
    resolve(std::slice::from_mut(doc))
}

/// Apply source -> heir overriding for one resolved pair.
fn apply_inheritance(source: &Node, heir: &mut Node) -> TydResult<()> {
    if heir.attrs().is_some_and(|a| a.no_inherit) {
        return Ok(());
    }

    match (source, heir) {
        // Strings do not merge.
        (Node::String(_), _) => Ok(()),
        (Node::Table(source), Node::Table(heir)) => {
            check_duplicate_names(&source.children)?;
            check_duplicate_names(&heir.children)?;

            // Inherited children land ahead of the heir's own, keeping
            // source declaration order among themselves.
            let mut front = 0;
            for child in &source.children {
                let existing = child.name().and_then(|name| heir.get_mut(name));
                match existing {
                    Some(existing) => apply_inheritance(child, existing)?,
                    None => {
                        heir.insert(front, child.clone())?;
                        front += 1;
                    }
                }
            }
            Ok(())
        }
        (Node::List(source), Node::List(heir)) => {
            heir.children.splice(0..0, source.children.iter().cloned());
            Ok(())
        }
        // Mismatched kinds have nothing meaningful to merge.
        _ => Ok(()),
    }
}

/// Reject duplicate non-null sibling names within one table level.
fn check_duplicate_names(children: &[Node]) -> TydResult<()> {
    let mut seen = HashSet::new();
    for child in children {
        let Some(name) = child.name() else {
            continue;
        };
        if !seen.insert(name) {
            return Err(TydError::duplicate(format!("duplicate node name '{name}'")));
        }
    }
    Ok(())
}
