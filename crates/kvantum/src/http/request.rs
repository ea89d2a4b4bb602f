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

//! HTTP request.

use std::fmt;

use crate::pattern::Variables;

use super::{Header, Headers, Method};

pub mod meta;
mod uri;

pub use meta::Meta;
pub use uri::{Query, Uri};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Transport protocol a request arrived on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Plain text.
    #[default]
    Http,
    /// TLS.
    Https,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request.
///
/// Besides the usual HTTP components, every request carries a [`Meta`] bag,
/// which is how matchers, middlewares and generators hand values to each
/// other during a single dispatch. The bag lives exactly as long as the
/// request, and is never shared.
///
/// # Examples
///
/// ```
/// use kvantum::http::{Method, Request};
///
/// // Create request
/// let req = Request::new()
///     .method(Method::Get)
///     .uri("/plot/survival/12?view=map");
///
/// assert_eq!(req.uri.path, "/plot/survival/12");
/// assert_eq!(req.uri.query.get("view"), Some("map"));
/// ```
#[derive(Debug)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri,
    /// Request headers.
    pub headers: Headers,
    /// Request body.
    pub body: Vec<u8>,
    /// Transport protocol.
    pub protocol: Protocol,
    /// Per-request metadata.
    pub meta: Meta,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Request {
    /// Creates a request.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method of the request.
    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI of the request.
    #[inline]
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        U: Into<Uri>,
    {
        self.uri = uri.into();
        self
    }

    /// Adds a header to the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::http::{Header, Request};
    ///
    /// // Create request and add header
    /// let req = Request::new()
    ///     .header(Header::Accept, "text/plain");
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    #[inline]
    #[must_use]
    pub fn header<V>(mut self, header: Header, value: V) -> Self
    where
        V: ToString,
    {
        self.headers.insert(header, value.to_string());
        self
    }

    /// Sets the body of the request.
    #[inline]
    #[must_use]
    pub fn body<B>(mut self, body: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        self.body = body.into();
        self
    }

    /// Sets the protocol of the request.
    #[inline]
    #[must_use]
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }
}

impl Request {
    /// Returns the variables captured by the matching handler, if any.
    #[inline]
    #[must_use]
    pub fn variables(&self) -> Option<&Variables> {
        self.meta.get(meta::VARIABLES)
    }

    /// Returns the value of a captured variable.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::http::Request;
    /// use kvantum::pattern::Variables;
    /// use kvantum::http::request::meta;
    ///
    /// // Create request and store variables
    /// let mut req = Request::new();
    /// req.meta.insert(meta::VARIABLES, Variables::from_iter([("id", "12")]));
    ///
    /// assert_eq!(req.variable("id"), Some("12"));
    /// assert_eq!(req.variable("world"), None);
    /// ```
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables().and_then(|variables| variables.get(name))
    }

    /// Selects a registered alternate outcome to run instead of generation.
    #[inline]
    pub fn use_alternate_outcome<S>(&mut self, identifier: S)
    where
        S: Into<String>,
    {
        self.meta.insert(meta::ALTERNATE_OUTCOME, identifier.into());
    }

    /// Returns the selected alternate outcome, if any.
    #[inline]
    #[must_use]
    pub fn alternate_outcome(&self) -> Option<&str> {
        self.meta
            .get::<String>(meta::ALTERNATE_OUTCOME)
            .map(String::as_str)
    }

    /// Asks the dispatcher to re-run routing for the given path.
    ///
    /// Only honored when the handler produced no response, which is the
    /// case when a middleware breaks the chain.
    #[inline]
    pub fn internal_redirect<S>(&mut self, path: S)
    where
        S: Into<String>,
    {
        self.meta.insert(meta::INTERNAL_REDIRECT, path.into());
    }

    /// Removes and returns the pending internal redirect, if any.
    #[inline]
    pub fn take_internal_redirect(&mut self) -> Option<String> {
        self.meta.remove(meta::INTERNAL_REDIRECT)
    }

    /// Creates a follow-up request for an internal redirect.
    ///
    /// Method, headers, body and protocol are carried over, whereas the URI
    /// is replaced and the metadata starts out empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::http::{Method, Request};
    ///
    /// // Create request and redirect it
    /// let mut req = Request::new()
    ///     .method(Method::Post)
    ///     .uri("/old");
    /// req.use_alternate_outcome("debug");
    ///
    /// let req = req.into_redirect("/new?page=2");
    /// assert_eq!(req.method, Method::Post);
    /// assert_eq!(req.uri.path, "/new");
    /// assert_eq!(req.alternate_outcome(), None);
    /// ```
    #[must_use]
    pub fn into_redirect(self, target: &str) -> Self {
        Self {
            uri: Uri::from(target),
            meta: Meta::new(),
            ..self
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Request {
    #[inline]
    fn default() -> Self {
        Self {
            method: Method::Get,
            uri: Uri::default(),
            headers: Headers::default(),
            body: Vec::new(),
            protocol: Protocol::default(),
            meta: Meta::default(),
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} HTTP/1.1\r\n", self.method, self.uri)?;
        write!(f, "{}\r\n", self.headers)?;
        write!(f, "[Body: {} bytes]\r\n", self.body.len())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_redirect_is_taken_once() {
        let mut req = Request::new().uri("/a");
        req.internal_redirect("/b");
        assert_eq!(req.take_internal_redirect().as_deref(), Some("/b"));
        assert_eq!(req.take_internal_redirect(), None);
    }

    #[test]
    fn redirect_keeps_transport_state() {
        let req = Request::new()
            .uri("/a")
            .protocol(Protocol::Https)
            .header(Header::Host, "example.org")
            .body("payload");

        let req = req.into_redirect("/b");
        assert_eq!(req.protocol, Protocol::Https);
        assert_eq!(req.headers.get(Header::Host), Some("example.org"));
        assert_eq!(req.body, b"payload");
        assert!(req.meta.is_empty());
    }
}
