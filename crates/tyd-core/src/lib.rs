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

//! Core parser, data model and inheritance resolver for the TyD format.
//!
//! TyD is a hierarchical, human-editable text format. A document is a
//! sequence of records; each record is a string leaf, a `{...}` table of
//! named children, or a `[...]` list of positional children. Tables and
//! lists may declare inheritance attributes (`*handle`, `*source`,
//! `*abstract`, `*noinherit`) that the [resolver](crate::inherit) uses to
//! copy fields between records.
//!
//! This crate covers text → tree ([`parse`], [`Parser`]), the tree itself
//! ([`Document`], [`Node`]), and inheritance resolution ([`resolve`],
//! [`Resolver`]). The canonical tree → text writer lives in `tyd-c14n`.
//!
//! ```
//! use tyd_core::{parse, resolve_document};
//!
//! let mut doc = parse(
//!     "ThingBase *handle thing *abstract { mass 1.0 }\n\
//!      Rock *source thing { color gray }",
//! )
//! .unwrap();
//! resolve_document(&mut doc).unwrap();
//!
//! let rock = doc.get("Rock").unwrap().as_table().unwrap();
//! assert!(rock.get("mass").is_some());
//! ```

mod error;
mod inherit;
pub mod lex;
mod node;
mod parser;

pub use error::{TydError, TydErrorKind, TydResult};
pub use inherit::{resolve, resolve_document, Resolver};
pub use node::{Document, ListNode, Node, RecordAttrs, StringNode, TableNode};
pub use parser::{parse, Parser};
