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

//! A TyD document tied to a path on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tyd_c14n::write_document;
use tyd_core::{parse, Document, TydError, TydResult};

/// A document paired with the file it was loaded from (or will be saved
/// to). Loading parses the file; saving writes the canonical form back.
///
/// ```no_run
/// use tyd::TydFile;
///
/// let mut file = TydFile::load("data/doors.tyd")?;
/// file.document_mut().add(tyd::Node::String(
///     tyd::StringNode::new(Some("extra"), Some("1")),
/// ))?;
/// file.save()?;
/// # Ok::<(), tyd::TydError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TydFile {
    document: Document,
    path: PathBuf,
}

impl TydFile {
    /// Pair an in-memory document with a path. No I/O happens until
    /// [`save`](Self::save).
    pub fn from_document(document: Document, path: impl Into<PathBuf>) -> Self {
        Self {
            document,
            path: path.into(),
        }
    }

    /// Read and parse the file at `path`.
    ///
    /// Every failure names the path: read failures come back as I/O
    /// errors, and parse errors keep their kind, line, column, and
    /// excerpt with the path prefixed to the message.
    pub fn load(path: impl Into<PathBuf>) -> TydResult<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path)
            .map_err(|e| TydError::io(format!("could not read {}: {e}", path.display())))?;
        let document = parse(&text).map_err(|mut e| {
            e.message = format!("error loading {}: {}", path.display(), e.message);
            e
        })?;
        Ok(Self { document, path })
    }

    /// Write the document back to its path in canonical form.
    pub fn save(&self) -> TydResult<()> {
        self.save_as(&self.path)
    }

    /// Write the document to another path, leaving `path` unchanged.
    pub fn save_as(&self, path: impl AsRef<Path>) -> TydResult<()> {
        let path = path.as_ref();
        fs::write(path, write_document(&self.document))
            .map_err(|e| TydError::io(format!("could not write {}: {e}", path.display())))
    }

    /// The parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The path this file loads from and saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name without its extension, when the path has one.
    pub fn base_name(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}
