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

//! Debug middleware.

use tracing::debug;

use crate::handler::outcome::DEBUG;
use crate::http::Request;

use super::{Flow, Middleware};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Debug middleware.
///
/// Logs every request it sees and selects the `debug` alternate outcome, so
/// the handler answers through its debug outcome instead of generating
/// directly. Handlers using this middleware must register that outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct Debug;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for Debug {
    fn handle(&mut self, req: &mut Request) -> Flow {
        debug!(
            method = %req.method,
            path = %req.uri.path,
            query = %req.uri.query,
            headers = req.headers.len(),
            "inspecting request"
        );
        req.use_alternate_outcome(DEBUG);
        Flow::Continue
    }
}
