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

//! Alternate outcomes.
//!
//! An alternate outcome is a named way of answering a request in place of
//! regular generation. Middlewares select one by its identifier, which must
//! have been registered with the handler.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::http::{Request, Response};

use super::{Error, RequestHandler, Result};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Identifier of the debug outcome.
pub const DEBUG: &str = "debug";

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Alternate outcome.
///
/// Besides types implementing this trait, closures taking the request and
/// the handler and returning anything convertible into a [`Response`] are
/// outcomes as well.
pub trait Outcome: Send + Sync + 'static {
    /// Produces the response in place of the handler.
    fn invoke(
        &self, req: &mut Request, handler: &dyn RequestHandler,
    ) -> Result<Response>;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Outcome that logs the request and defers to regular generation.
///
/// Registered as the [`DEBUG`] outcome for views created with debugging
/// enabled, pairing with the [`Debug`][] middleware.
///
/// [`Debug`]: crate::middleware::Debug
#[derive(Clone, Copy, Debug, Default)]
pub struct Delegate;

/// Registry of alternate outcomes by identifier.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::handler::{Outcomes, RequestHandler};
/// use kvantum::http::{Request, Response, ResponseExt, Status};
///
/// // Create registry and register outcome
/// let mut outcomes = Outcomes::new();
/// outcomes.register("login", |_: &mut Request, _: &dyn RequestHandler| {
///     Response::redirect("/login")
/// })?;
///
/// assert!(outcomes.contains("login"));
/// assert!(outcomes.register("", |_: &mut Request, _: &dyn RequestHandler| {
///     Response::from_status(Status::Ok)
/// }).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Outcomes {
    /// Outcomes by identifier.
    inner: HashMap<String, Box<dyn Outcome>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Outcomes {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an outcome, replacing any outcome of the same identifier.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::InvalidOutcome`], if the identifier is
    /// empty.
    pub fn register<S, O>(&mut self, identifier: S, outcome: O) -> Result
    where
        S: Into<String>,
        O: Outcome,
    {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(Error::InvalidOutcome);
        }
        self.inner.insert(identifier, Box::new(outcome));
        Ok(())
    }

    /// Returns the outcome for the given identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&dyn Outcome> {
        self.inner.get(identifier).map(AsRef::as_ref)
    }

    /// Returns whether an outcome is registered for the identifier.
    #[inline]
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.inner.contains_key(identifier)
    }
}

#[allow(clippy::must_use_candidate)]
impl Outcomes {
    /// Returns the number of outcomes.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any outcomes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Outcome for Delegate {
    fn invoke(
        &self, req: &mut Request, handler: &dyn RequestHandler,
    ) -> Result<Response> {
        debug!(
            handler = handler.name(),
            id = %handler.id(),
            kind = handler.kind(),
            method = %req.method,
            path = %req.uri.path,
            meta = ?req.meta,
            "debug outcome"
        );
        handler.generate(req)
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for Outcomes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.inner.keys().collect::<Vec<_>>();
        keys.sort();
        f.debug_set().entries(keys).finish()
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Outcome for F
where
    F: Fn(&mut Request, &dyn RequestHandler) -> R + Send + Sync + 'static,
    R: Into<Response>,
{
    #[inline]
    fn invoke(
        &self, req: &mut Request, handler: &dyn RequestHandler,
    ) -> Result<Response> {
        Ok(self(req, handler).into())
    }
}
