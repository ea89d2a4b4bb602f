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

//! Middleware.
//!
//! Every handler owns a [`Populator`], which creates a fresh [`Queue`] of
//! middlewares for each request it handles. Middlewares run in registration
//! order, may mutate the request, and may stop the chain. They never produce
//! responses themselves; a middleware that wants a different response selects
//! an alternate outcome on the request instead.

use std::fmt;

use super::http::Request;

mod debug;
mod populator;
mod queue;

pub use debug::Debug;
pub use populator::{Factory, Populator};
pub use queue::Queue;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Decision of a middleware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Hand the request to the next middleware.
    Continue,
    /// Stop the chain, so no response is generated.
    Break,
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Middleware.
///
/// Instances are created per request by a [`Factory`], so a middleware may
/// keep state between its invocation and the end of the request, but never
/// across requests. Besides types implementing this trait, closures taking a
/// mutable request and returning a [`Flow`] are middlewares as well.
///
/// # Examples
///
/// ```
/// use kvantum::http::{Header, Request};
/// use kvantum::middleware::{Flow, Middleware};
///
/// // Define middleware
/// #[derive(Default)]
/// struct RequireHost;
///
/// // Create middleware implementation
/// impl Middleware for RequireHost {
///     fn handle(&mut self, req: &mut Request) -> Flow {
///         if req.headers.contains(Header::Host) {
///             Flow::Continue
///         } else {
///             Flow::Break
///         }
///     }
/// }
///
/// // Handle request with middleware
/// let mut req = Request::new();
/// assert_eq!(RequireHost.handle(&mut req), Flow::Break);
/// ```
pub trait Middleware: 'static {
    /// Handles the given request.
    fn handle(&mut self, req: &mut Request) -> Flow;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Box<dyn Middleware> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Box<dyn Middleware>")
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F> Middleware for F
where
    F: FnMut(&mut Request) -> Flow + 'static,
{
    #[inline]
    fn handle(&mut self, req: &mut Request) -> Flow {
        self(req)
    }
}
