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

//! Fallback handler.

use uuid::Uuid;

use crate::http::{Request, Response, ResponseExt, Status};

use super::{RequestHandler, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Fallback handler.
///
/// Answers with "404 Not Found". The router creates one bound to the path of
/// every request no registered handler matched.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::handler::{NotFound, RequestHandler};
/// use kvantum::http::{Request, Status};
///
/// // Create fallback handler
/// let handler = NotFound::new("/missing");
/// assert_eq!(handler.filter(), "/missing");
///
/// // Generate response
/// let res = handler.generate(&mut Request::new().uri("/missing"))?;
/// assert_eq!(res.status, Status::NotFound);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NotFound {
    /// Identifier.
    id: Uuid,
    /// Path the handler is bound to.
    path: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl NotFound {
    /// Creates a fallback handler bound to the given path.
    #[must_use]
    pub fn new<S>(path: S) -> Self
    where
        S: Into<String>,
    {
        Self { id: Uuid::new_v4(), path: path.into() }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl RequestHandler for NotFound {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        "404"
    }

    fn filter(&self) -> &str {
        &self.path
    }

    fn matches(&self, req: &mut Request) -> Result<bool> {
        Ok(req.uri.path == self.path)
    }

    fn generate(&self, _req: &mut Request) -> Result<Response> {
        Ok(Response::from_status(Status::NotFound))
    }
}
