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

//! View builder.

use std::fmt;
use uuid::Uuid;

use crate::handler::{
    Outcome, Outcomes, Result, Stage, Validator, Validators,
};
use crate::http::{Header, Headers, Method};
use crate::middleware::{Middleware, Populator};
use crate::pattern::{self, Pattern, TryIntoPattern};

use super::{Resolver, View};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// View builder.
///
/// Errors from compiling the pattern or registering outcomes are kept until
/// [`Builder::build`], so builder methods can be chained freely.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::handler::{RequestHandler, View};
/// use kvantum::http::{Header, Method, Request, Response, ResponseExt};
/// use kvantum::middleware::Debug;
///
/// // Create view with all options
/// let view = View::builder("/account", |_: &mut Request| "account")
///     .name("account")
///     .method(Method::Get)
///     .force_https(true)
///     .header(Header::CacheControl, "no-store")
///     .with::<Debug>()
///     .outcome("debug", |_: &mut Request, _: &dyn RequestHandler| {
///         Response::from_text("debugging")
///     })
///     .build()?;
///
/// assert!(view.force_https());
/// # Ok(())
/// # }
/// ```
pub struct Builder<R> {
    /// Compiled pattern or compilation error.
    pattern: pattern::Result<Pattern>,
    /// Content resolver.
    resolver: R,
    /// Name used in logs.
    name: Option<String>,
    /// Accepted method, or any.
    method: Option<Method>,
    /// Whether to require HTTPS.
    force_https: bool,
    /// Headers added to every response.
    headers: Headers,
    /// Alternate outcomes.
    outcomes: Outcomes,
    /// First error from registering outcomes.
    deferred: Result,
    /// Middleware populator.
    populator: Populator,
    /// Request validators.
    validators: Validators,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<R> Builder<R>
where
    R: Resolver,
{
    /// Creates a view builder.
    pub fn new<P>(pattern: P, resolver: R) -> Self
    where
        P: TryIntoPattern,
    {
        Self {
            pattern: pattern.try_into_pattern(),
            resolver,
            name: None,
            method: None,
            force_https: false,
            headers: Headers::new(),
            outcomes: Outcomes::new(),
            deferred: Ok(()),
            populator: Populator::new(),
            validators: Validators::new(),
        }
    }

    /// Sets the name used in logs, which defaults to the pattern.
    #[must_use]
    pub fn name<S>(mut self, name: S) -> Self
    where
        S: Into<String>,
    {
        self.name = Some(name.into());
        self
    }

    /// Restricts the view to the given method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets whether the view must only be served over HTTPS.
    #[must_use]
    pub fn force_https(mut self, force_https: bool) -> Self {
        self.force_https = force_https;
        self
    }

    /// Adds a header to every response, unless the resolver sets it.
    #[allow(clippy::needless_pass_by_value)]
    #[must_use]
    pub fn header<V>(mut self, header: Header, value: V) -> Self
    where
        V: ToString,
    {
        self.headers.insert(header, value.to_string());
        self
    }

    /// Registers an alternate outcome.
    #[must_use]
    pub fn outcome<S, O>(mut self, identifier: S, outcome: O) -> Self
    where
        S: Into<String>,
        O: Outcome,
    {
        let res = self.outcomes.register(identifier, outcome);
        if self.deferred.is_ok() {
            self.deferred = res;
        }
        self
    }

    /// Adds a middleware type, created with [`Default`] per request.
    #[must_use]
    pub fn with<M>(mut self) -> Self
    where
        M: Middleware + Default,
    {
        self.populator.add::<M>();
        self
    }

    /// Adds a function creating a middleware per request.
    #[must_use]
    pub fn middleware<F, M>(mut self, factory: F) -> Self
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Middleware,
    {
        self.populator.add_factory(factory);
        self
    }

    /// Adds a validator for the given stage, run before the middlewares.
    #[must_use]
    pub fn validate<V>(mut self, stage: Stage, validator: V) -> Self
    where
        V: Validator,
    {
        self.validators.add(stage, validator);
        self
    }

    /// Builds the view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Pattern`][], if the pattern is malformed,
    /// and [`Error::InvalidOutcome`][], if an outcome was registered with an
    /// empty identifier.
    ///
    /// [`Error::InvalidOutcome`]: crate::handler::Error::InvalidOutcome
    /// [`Error::Pattern`]: crate::handler::Error::Pattern
    pub fn build(self) -> Result<View<R>> {
        let pattern = self.pattern?;
        self.deferred?;
        Ok(View {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(|| pattern.as_str().to_string()),
            pattern,
            method: self.method,
            force_https: self.force_https,
            headers: self.headers,
            outcomes: self.outcomes,
            populator: self.populator,
            validators: self.validators,
            resolver: self.resolver,
        })
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<R> fmt::Debug for Builder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("method", &self.method)
            .field("outcomes", &self.outcomes)
            .field("populator", &self.populator)
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Error, RequestHandler};
    use crate::http::{Request, Response, ResponseExt};

    #[test]
    fn reports_pattern_errors_on_build() {
        let res = View::builder("/{a", |_: &mut Request| "a").build();
        assert!(matches!(res, Err(Error::Pattern(pattern::Error::Unclosed(_)))));
    }

    #[test]
    fn reports_empty_outcome_identifier_on_build() {
        let res = View::builder("/a", |_: &mut Request| "a")
            .outcome("", |_: &mut Request, _: &dyn RequestHandler| {
                Response::from_text("b")
            })
            .outcome("c", |_: &mut Request, _: &dyn RequestHandler| {
                Response::from_text("c")
            })
            .build();
        assert!(matches!(res, Err(Error::InvalidOutcome)));
    }
}
