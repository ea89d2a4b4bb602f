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

//! Handler error.

use std::io;
use thiserror::Error;

use crate::pattern;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Handler error.
#[derive(Debug, Error)]
pub enum Error {
    /// Pattern error.
    #[error(transparent)]
    Pattern(#[from] pattern::Error),

    /// Alternate outcome selected, but not registered with the handler.
    #[error("handler {handler:?} has no alternate outcome {outcome:?}")]
    UnregisteredOutcome {
        /// Handler name.
        handler: String,
        /// Outcome identifier.
        outcome: String,
    },

    /// Alternate outcome registered with an empty identifier.
    #[error("alternate outcome identifier must not be empty")]
    InvalidOutcome,

    /// Middleware queue run more than once.
    #[error("middleware queue was already consumed")]
    Consumed,

    /// Request rejected by a validator.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Request metadata expected by the generator is absent.
    #[error("missing request metadata: {0}")]
    Missing(&'static str),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Generation failed.
    #[error("generation failed: {0}")]
    Generate(String),
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Handler result.
pub type Result<T = ()> = std::result::Result<T, Error>;
