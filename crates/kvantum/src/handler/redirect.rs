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

//! HTTPS redirect handler.

use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::http::{Header, Request, Response, ResponseExt, Status, Uri};

use super::{RequestHandler, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTPS redirect handler.
///
/// Answers with a redirect to the same resource on the secure address. Used
/// by the dispatcher in place of handlers that must only be served over
/// HTTPS, whenever a request arrives over plain HTTP.
///
/// # Examples
///
/// ```
/// use kvantum::handler::HttpsRedirect;
/// use kvantum::http::Request;
///
/// // Create redirect handler for a non-standard port
/// let handler = HttpsRedirect::new("example.org", 8443);
///
/// // Compute location
/// let req = Request::new().uri("/account?tab=keys");
/// assert_eq!(
///     handler.location(&req),
///     "https://example.org:8443/account/?tab=keys"
/// );
/// ```
#[derive(Debug)]
pub struct HttpsRedirect {
    /// Identifier.
    id: Uuid,
    /// Public host name.
    address: String,
    /// HTTPS port.
    port: u16,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl HttpsRedirect {
    /// Creates an HTTPS redirect handler.
    #[must_use]
    pub fn new<S>(address: S, port: u16) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            address: address.into(),
            port,
        }
    }

    /// Creates an HTTPS redirect handler from the configured address.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.web_address.clone(), config.ssl.port)
    }

    /// Returns the secure location of the requested resource.
    ///
    /// The port is omitted when it's the default, and a trailing slash is
    /// added to the path if missing.
    #[must_use]
    pub fn location(&self, req: &Request) -> String {
        let mut location = format!("https://{}", self.address);
        if self.port != 443 {
            location.push_str(&format!(":{}", self.port));
        }

        // Ensure trailing slash before appending the query string
        let mut path = req.uri.path.clone();
        if !path.ends_with('/') {
            path.push('/');
        }
        let uri = Uri::from_parts(path, req.uri.query.clone());
        location.push_str(&uri.to_string());
        location
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl RequestHandler for HttpsRedirect {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        "https-redirect"
    }

    fn filter(&self) -> &str {
        ""
    }

    fn matches(&self, _req: &mut Request) -> Result<bool> {
        Ok(true)
    }

    fn generate(&self, req: &mut Request) -> Result<Response> {
        let location = self.location(req);
        debug!(location = location.as_str(), "redirecting to https");

        // Compose body for clients that don't follow redirects
        let href = escape(&location);
        let body = format!(
            "<h1>Redirecting...</h1>\n<p>If the request isn't redirecting, \
             click: <a href=\"{href}\" title=\"HTTPS Redirect\">{href}</a>"
        );
        Ok(Response::new()
            .status(Status::Found)
            .header(Header::Location, location)
            .html(body))
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Escapes characters with special meaning in HTML attributes.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_secure_locations() {
        for (address, port, uri, expected) in [
            ("example.org", 443, "/", "https://example.org/"),
            ("example.org", 443, "/a/b", "https://example.org/a/b/"),
            ("example.org", 443, "/a/", "https://example.org/a/"),
            ("localhost", 8443, "/a?x=1&y=2", "https://localhost:8443/a/?x=1&y=2"),
        ] {
            let handler = HttpsRedirect::new(address, port);
            let req = Request::new().uri(uri);
            assert_eq!(handler.location(&req), expected, "{uri:?}");
        }
    }

    #[test]
    fn responds_with_found() {
        let handler = HttpsRedirect::new("example.org", 443);
        let mut req = Request::new().uri("/login?next=a&b");
        let res = handler.generate(&mut req).expect("response");

        assert_eq!(res.status, Status::Found);
        assert_eq!(
            res.headers.get(Header::Location),
            Some("https://example.org/login/?next=a&b")
        );
        let body = res.body.into_bytes().expect("in-memory body");
        let body = String::from_utf8(body).expect("utf-8 body");
        assert!(body.contains("href=\"https://example.org/login/?next=a&amp;b\""));
    }
}
