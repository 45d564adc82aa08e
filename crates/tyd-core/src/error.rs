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

//! Error types for TyD parsing and inheritance resolution.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TydErrorKind {
    /// Lexical or structural violation in the source text.
    Syntax,
    /// Invalid escape sequence or dangling backslash.
    Escape,
    /// Unknown record attribute name.
    Attribute,
    /// Duplicate handle within one resolution scope.
    Handle,
    /// `source` attribute referring to a handle nobody declares.
    Source,
    /// Unresolvable or cyclic inheritance chain.
    Inheritance,
    /// Duplicate sibling name within one table (pre- or post-merge).
    Duplicate,
    /// API misuse when composing a tree programmatically.
    Structure,
    /// I/O error (file operations).
    IO,
}

impl fmt::Display for TydErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Escape => write!(f, "EscapeError"),
            Self::Attribute => write!(f, "AttributeError"),
            Self::Handle => write!(f, "HandleError"),
            Self::Source => write!(f, "SourceError"),
            Self::Inheritance => write!(f, "InheritanceError"),
            Self::Duplicate => write!(f, "DuplicateError"),
            Self::Structure => write!(f, "StructureError"),
            Self::IO => write!(f, "IOError"),
        }
    }
}

/// An error raised by parsing, tree mutation, or inheritance resolution.
///
/// Parse errors carry a 1-based line, usually a column, and a bounded
/// excerpt of the surrounding source with an inserted `[ERROR]` marker.
/// Inheritance errors carry the offending handle or name in the message.
#[derive(Debug, Clone, Error)]
pub struct TydError {
    /// The kind of error.
    pub kind: TydErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based; 0 when no source position applies).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Bounded source excerpt around the failure offset.
    pub excerpt: Option<String>,
}

impl fmt::Display for TydError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.kind, self.message)?;
        } else if let Some(column) = self.column {
            write!(
                f,
                "{} at line {}, col {}: {}",
                self.kind, self.line, column, self.message
            )?;
        } else {
            write!(f, "{} at line {}: {}", self.kind, self.line, self.message)?;
        }
        if let Some(excerpt) = &self.excerpt {
            write!(f, "\n{}", excerpt)?;
        }
        Ok(())
    }
}

impl TydError {
    /// Create a new error.
    pub fn new(kind: TydErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            excerpt: None,
        }
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add a source excerpt.
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    // Convenience constructors for each error kind
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(TydErrorKind::Syntax, message, line)
    }

    pub fn escape(message: impl Into<String>, line: usize) -> Self {
        Self::new(TydErrorKind::Escape, message, line)
    }

    pub fn attribute(message: impl Into<String>, line: usize) -> Self {
        Self::new(TydErrorKind::Attribute, message, line)
    }

    pub fn handle(message: impl Into<String>) -> Self {
        Self::new(TydErrorKind::Handle, message, 0)
    }

    pub fn source(message: impl Into<String>) -> Self {
        Self::new(TydErrorKind::Source, message, 0)
    }

    pub fn inheritance(message: impl Into<String>) -> Self {
        Self::new(TydErrorKind::Inheritance, message, 0)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(TydErrorKind::Duplicate, message, 0)
    }

    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(TydErrorKind::Structure, message, 0)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TydErrorKind::IO, message, 0)
    }
}

/// Result type for TyD operations.
pub type TydResult<T> = Result<T, TydError>;
