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

//! Pattern-matched views.
//!
//! A [`View`] pairs a filter pattern with a [`Resolver`], which decides the
//! content. File serving, redirects and application pages are all views that
//! differ in their resolver only.

use std::fmt;
use tracing::trace;
use uuid::Uuid;

use crate::http::request::meta;
use crate::http::{Headers, Method, Request, Response};
use crate::middleware::Populator;
use crate::pattern::{Pattern, TryIntoPattern};

use super::{Outcomes, RequestHandler, Result, Validators};

mod builder;
mod extension;
mod files;

pub use builder::Builder;
pub use extension::Extension;
pub use files::StaticFiles;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Content resolver.
///
/// Resolvers receive the request after the pattern matched, with captured
/// variables already attached. Closures taking the request and returning
/// anything convertible into a [`Response`] are resolvers that accept every
/// matched request.
pub trait Resolver: Send + Sync + 'static {
    /// Returns whether the matched request can be served.
    ///
    /// This is a secondary check after pattern matching, e.g., to verify that
    /// a file exists. Values stored in the request's metadata here are handed
    /// to [`Resolver::generate`].
    fn passes(&self, _req: &mut Request) -> Result<bool> {
        Ok(true)
    }

    /// Generates the response.
    fn generate(&self, req: &mut Request) -> Result<Response>;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Pattern-matched view.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::handler::{RequestHandler, View};
/// use kvantum::http::{Method, Request};
///
/// // Create view restricted to GET
/// let view = View::builder("/plot/{world}/{id}", |req: &mut Request| {
///     format!("plot {}", req.variable("id").unwrap_or_default())
/// })
/// .method(Method::Get)
/// .build()?;
///
/// // Match requests
/// let mut req = Request::new().uri("/plot/survival/12");
/// assert!(view.matches(&mut req)?);
/// assert_eq!(req.variable("world"), Some("survival"));
///
/// let mut req = Request::new().method(Method::Post).uri("/plot/survival/12");
/// assert!(!view.matches(&mut req)?);
/// # Ok(())
/// # }
/// ```
pub struct View<R> {
    /// Identifier.
    id: Uuid,
    /// Name used in logs.
    name: String,
    /// Filter pattern.
    pattern: Pattern,
    /// Accepted method, or any.
    method: Option<Method>,
    /// Whether to require HTTPS.
    force_https: bool,
    /// Headers added to every response.
    headers: Headers,
    /// Alternate outcomes.
    outcomes: Outcomes,
    /// Middleware populator.
    populator: Populator,
    /// Request validators.
    validators: Validators,
    /// Content resolver.
    resolver: R,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<R> View<R>
where
    R: Resolver,
{
    /// Creates a view builder.
    ///
    /// Pattern errors are reported when building the view.
    pub fn builder<P>(pattern: P, resolver: R) -> Builder<R>
    where
        P: TryIntoPattern,
    {
        Builder::new(pattern, resolver)
    }
}

impl<R> View<R> {
    /// Returns the filter pattern.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the headers added to every response.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the content resolver.
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<R> RequestHandler for View<R>
where
    R: Resolver,
{
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self) -> &str {
        self.pattern.as_str()
    }

    fn method(&self) -> Option<Method> {
        self.method
    }

    /// Matches method and pattern, then asks the resolver.
    ///
    /// Captured variables are attached to the request before the resolver is
    /// asked, and stay attached if it declines.
    fn matches(&self, req: &mut Request) -> Result<bool> {
        if self.method.is_some_and(|method| method != req.method) {
            trace!(view = self.name.as_str(), method = %req.method, "method mismatch");
            return Ok(false);
        }

        // Match pattern and attach variables
        let Some(variables) = self.pattern.matches(&req.uri.path) else {
            return Ok(false);
        };
        trace!(view = self.name.as_str(), %variables, "pattern matched");
        req.meta.insert(meta::VARIABLES, variables);
        self.resolver.passes(req)
    }

    fn generate(&self, req: &mut Request) -> Result<Response> {
        let mut res = self.resolver.generate(req)?;
        for (header, value) in &self.headers {
            res.headers.insert_default(header, value);
        }
        Ok(res)
    }

    fn force_https(&self) -> bool {
        self.force_https
    }

    fn outcomes(&self) -> Option<&Outcomes> {
        Some(&self.outcomes)
    }

    fn populator(&self) -> Option<&Populator> {
        Some(&self.populator)
    }

    fn validators(&self) -> Option<&Validators> {
        Some(&self.validators)
    }
}

// ----------------------------------------------------------------------------

impl<R> fmt::Debug for View<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("method", &self.method)
            .field("force_https", &self.force_https)
            .field("outcomes", &self.outcomes)
            .field("populator", &self.populator)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

impl<R> fmt::Display for View<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{name: {}, id: {}, pattern: {}}}",
            self.name, self.id, self.pattern
        )
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, T> Resolver for F
where
    F: Fn(&mut Request) -> T + Send + Sync + 'static,
    T: Into<Response>,
{
    #[inline]
    fn generate(&self, req: &mut Request) -> Result<Response> {
        Ok(self(req).into())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Header, ResponseExt, Status};
    use crate::pattern::Variables;

    struct Reject;

    impl Resolver for Reject {
        fn passes(&self, _req: &mut Request) -> Result<bool> {
            Ok(false)
        }

        fn generate(&self, _req: &mut Request) -> Result<Response> {
            Ok(Response::from_status(Status::Ok))
        }
    }

    #[test]
    fn variables_stay_attached_when_resolver_declines() {
        let view = View::builder("/plot/{world}", Reject).build().expect("view");
        let mut req = Request::new().uri("/plot/survival");

        assert!(!view.matches(&mut req).expect("no error"));
        assert_eq!(
            req.variables(),
            Some(&Variables::from_iter([("world", "survival")]))
        );
    }

    #[test]
    fn method_mismatch_skips_pattern() {
        let view = View::builder("/a", |_: &mut Request| "a")
            .method(Method::Post)
            .build()
            .expect("view");
        let mut req = Request::new().method(Method::Get).uri("/a");

        assert!(!view.matches(&mut req).expect("no error"));
        assert!(req.variables().is_none());
    }

    #[test]
    fn default_headers_never_override() {
        let view = View::builder("/a", |_: &mut Request| {
            Response::from_text("a").header(Header::CacheControl, "no-store")
        })
        .header(Header::CacheControl, "max-age=60")
        .header(Header::Server, "kvantum")
        .build()
        .expect("view");

        let res = view.generate(&mut Request::new()).expect("response");
        assert_eq!(res.headers.get(Header::CacheControl), Some("no-store"));
        assert_eq!(res.headers.get(Header::Server), Some("kvantum"));
    }

    #[test]
    fn name_defaults_to_pattern() {
        let view = View::builder("/a/{b}", |_: &mut Request| "a")
            .build()
            .expect("view");
        assert_eq!(view.name(), "/a/{b}");

        let view = View::builder("/a/{b}", |_: &mut Request| "a")
            .name("a")
            .build()
            .expect("view");
        assert_eq!(view.name(), "a");
        assert_eq!(view.filter(), "/a/{b}");
    }
}
