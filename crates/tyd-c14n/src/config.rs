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

//! Configuration for the canonical writer.

/// Spaces per indentation level in canonical output.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Longest naked value emitted unquoted, counted in characters.
pub const DEFAULT_QUOTE_THRESHOLD: usize = 40;

/// Output configuration for the writer.
///
/// The defaults produce the canonical form; round-trip guarantees are
/// stated for the defaults. Other settings are for display purposes.
///
/// ```
/// use tyd_c14n::WriteConfig;
///
/// let config = WriteConfig::new().with_indent_width(2);
/// assert_eq!(config.indent_width, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteConfig {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Values longer than this many characters are always quoted.
    pub quote_threshold: usize,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            quote_threshold: DEFAULT_QUOTE_THRESHOLD,
        }
    }
}

impl WriteConfig {
    /// Create the canonical configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per nesting level.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the naked-value length threshold.
    pub fn with_quote_threshold(mut self, threshold: usize) -> Self {
        self.quote_threshold = threshold;
        self
    }
}
