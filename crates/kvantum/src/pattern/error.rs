// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Pattern error.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Pattern error.
///
/// Patterns are validated when compiled, so malformed filters are rejected
/// before a handler can be registered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Placeholder without closing brace.
    #[error("unclosed placeholder in pattern: {0}")]
    Unclosed(String),

    /// Closing brace without placeholder.
    #[error("unopened placeholder in pattern: {0}")]
    Unopened(String),

    /// Placeholder inside of placeholder.
    #[error("nested placeholder in pattern: {0}")]
    Nested(String),

    /// Placeholder without name.
    #[error("empty placeholder in pattern: {0}")]
    Empty(String),

    /// Placeholder name used more than once.
    #[error("duplicate placeholder {name:?} in pattern: {pattern}")]
    Duplicate {
        /// Pattern.
        pattern: String,
        /// Placeholder name.
        name: String,
    },
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Pattern result.
pub type Result<T = ()> = std::result::Result<T, Error>;
