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

//! Property-based tests for the write → parse round trip.
//!
//! The generator builds arbitrary well-formed trees: named records at
//! document and table level, anonymous records inside lists, string values
//! drawn from the full unicode range including the structural characters
//! and the `null` literal.
//!
//! # Properties Tested
//!
//! 1. **Round trip**: `parse(write(tree)) == tree` for every generated tree
//! 2. **Fixed point**: writing the reparsed tree reproduces the text exactly
//! 3. **Determinism**: writing the same tree twice produces identical text
//! 4. **Value fidelity**: any string value survives the trip unchanged

use proptest::prelude::*;
use tyd_c14n::write_document;
use tyd_core::{parse, Document, ListNode, Node, RecordAttrs, StringNode, TableNode};

/// A record name or attribute argument: the symbol alphabet.
fn symbol() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{0,8}"
}

/// A string value: null, plain text, or text loaded with structural
/// characters and escapes.
fn string_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        1 => Just(Some("null".to_string())),
        4 => "[a-zA-Z0-9 .,_-]{0,50}".prop_map(Some),
        3 => any::<String>().prop_map(Some),
    ]
}

fn attrs() -> impl Strategy<Value = RecordAttrs> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::option::of(symbol()),
        prop::option::of(symbol()),
    )
        .prop_map(|(is_abstract, no_inherit, handle, source)| RecordAttrs {
            handle,
            source,
            is_abstract,
            no_inherit,
        })
}

fn string_node(named: bool) -> BoxedStrategy<Node> {
    let name = name_strategy(named);
    (name, string_value())
        .prop_map(|(name, value)| Node::String(StringNode::new(name.as_deref(), value.as_deref())))
        .boxed()
}

fn name_strategy(named: bool) -> BoxedStrategy<Option<String>> {
    if named {
        symbol().prop_map(Some).boxed()
    } else {
        Just(None).boxed()
    }
}

/// Any record valid at a position that does (or does not) expect names.
/// Table children carry names; list items never do.
fn node(depth: u32, named: bool) -> BoxedStrategy<Node> {
    if depth == 0 {
        return string_node(named);
    }
    prop_oneof![
        4 => string_node(named),
        1 => (
            name_strategy(named),
            attrs(),
            prop::collection::vec(node(depth - 1, true), 0..4),
        )
            .prop_map(|(name, attrs, children)| {
                let mut table = TableNode::new(name.as_deref());
                table.attrs = attrs;
                for child in children {
                    table.add(child).unwrap();
                }
                Node::Table(table)
            }),
        1 => (
            name_strategy(named),
            attrs(),
            prop::collection::vec(node(depth - 1, false), 0..4),
        )
            .prop_map(|(name, attrs, children)| {
                let mut list = ListNode::new(name.as_deref());
                list.attrs = attrs;
                for child in children {
                    list.add(child).unwrap();
                }
                Node::List(list)
            }),
    ]
    .boxed()
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(node(3, true), 0..5).prop_map(Document::from_nodes)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Property: parsing canonical output reproduces the tree exactly.
    #[test]
    fn prop_roundtrip_tree(doc in document()) {
        let text = write_document(&doc);
        let reparsed = parse(&text);
        prop_assert!(reparsed.is_ok(), "canonical output failed to parse:\n{}", text);
        prop_assert_eq!(doc, reparsed.unwrap());
    }

    /// Property: canonical text is a fixed point of write → parse → write.
    #[test]
    fn prop_write_fixed_point(doc in document()) {
        let text1 = write_document(&doc);
        let reparsed = parse(&text1).unwrap();
        let text2 = write_document(&reparsed);
        prop_assert_eq!(text1, text2);
    }

    /// Property: the writer is deterministic.
    #[test]
    fn prop_write_deterministic(doc in document()) {
        prop_assert_eq!(write_document(&doc), write_document(&doc));
    }

    /// Property: every string value survives the round trip unchanged,
    /// including values colliding with `null`, the structural characters,
    /// and arbitrary unicode.
    #[test]
    fn prop_value_fidelity(value in string_value()) {
        let mut doc = Document::new();
        doc.add(Node::String(StringNode::new(Some("x"), value.as_deref())))
            .unwrap();

        let reparsed = parse(&write_document(&doc)).unwrap();
        let node = reparsed.get("x").unwrap().as_string().unwrap();
        prop_assert_eq!(node.value.as_deref(), value.as_deref());
    }

    /// Property: parsing is deterministic over canonical text.
    #[test]
    fn prop_parse_deterministic(doc in document()) {
        let text = write_document(&doc);
        prop_assert_eq!(parse(&text).unwrap(), parse(&text).unwrap());
    }
}
