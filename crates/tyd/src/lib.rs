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

//! # TyD - a tidy, hierarchical, human-editable data language
//!
//! TyD documents are sequences of records: string leaves, `{...}` tables
//! of named children, and `[...]` lists of positional children. Records
//! can inherit fields from each other through `*handle`/`*source`
//! attributes, resolved after parsing.
//!
//! ## Quick Start
//!
//! ```rust
//! use tyd::{parse, resolve_document, write_document};
//!
//! let mut doc = parse(
//!     "DoorBase *handle door *abstract\n\
//!      {\n\
//!          openSpeed 1.0\n\
//!      }\n\
//!      IronDoor *source door\n\
//!      {\n\
//!          material iron\n\
//!      }",
//! )?;
//!
//! // Apply inheritance: IronDoor picks up openSpeed from DoorBase.
//! resolve_document(&mut doc)?;
//! let door = doc.get("IronDoor").unwrap().as_table().unwrap();
//! assert!(door.get("openSpeed").is_some());
//!
//! // Write the canonical text form back out.
//! let text = write_document(&doc);
//! assert!(text.contains("material iron"));
//! # Ok::<(), tyd::TydError>(())
//! ```
//!
//! ## Crates
//!
//! - `tyd-core`: parser, node tree, inheritance resolver
//! - `tyd-c14n`: canonical writer
//!
//! This crate re-exports both and adds [`TydFile`] for documents tied to
//! a path on disk.

pub use tyd_core::{
    // Parsing
    parse,
    // Resolution
    resolve,
    resolve_document,
    Document,
    ListNode,
    Node,
    Parser,
    RecordAttrs,
    Resolver,
    StringNode,
    TableNode,
    // Errors
    TydError,
    TydErrorKind,
    TydResult,
};

pub use tyd_c14n::{
    write, write_document, write_document_with_config, write_with_config, WriteConfig, Writer,
};

// Re-export lexical constants and helpers for tooling built on top.
pub mod lex {
    //! Lexical definitions of the format.
    pub use tyd_core::lex::{
        escape_quoted, is_symbol_char, unescape, SourcePos, ATTRIBUTE_CHAR, COMMENT_CHAR,
        NULL_LITERAL, QUOTE_CHAR, RECORD_END_CHAR, VERTICAL_CHAR,
    };
}

mod file;
pub use file::TydFile;
