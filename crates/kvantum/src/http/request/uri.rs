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

//! HTTP request URI.

use std::fmt;

mod encoding;
mod query;

use encoding::{decode_path, encode_path};
pub use query::Query;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request URI.
///
/// Only the path and query string are kept. The path is stored decoded, and
/// since patterns are matched against the path alone, the query string never
/// takes part in routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uri {
    /// Request path.
    pub path: String,
    /// Query string.
    pub query: Query,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Uri {
    /// Creates a request URI.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request URI from a decoded path and a query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::http::{Query, Uri};
    ///
    /// // Create request URI from parts
    /// let uri = Uri::from_parts("/a b", Query::from_iter([("q", "1")]));
    /// assert_eq!(uri.to_string(), "/a%20b?q=1");
    /// ```
    #[inline]
    #[must_use]
    pub fn from_parts<P>(path: P, query: Query) -> Self
    where
        P: Into<String>,
    {
        Uri { path: path.into(), query }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl From<&str> for Uri {
    /// Creates a request URI from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::http::Uri;
    ///
    /// // Create request URI from string
    /// let uri = Uri::from("/files/read%20me.txt?download");
    /// assert_eq!(uri.path, "/files/read me.txt");
    /// assert!(uri.query.contains("download"));
    /// ```
    fn from(value: &str) -> Self {
        match value.split_once('?') {
            Some((path, query)) => Uri {
                path: decode_path(path),
                query: Query::from(query),
            },
            None => Uri {
                path: decode_path(value),
                query: Query::default(),
            },
        }
    }
}

impl From<String> for Uri {
    #[inline]
    fn from(value: String) -> Self {
        Uri::from(value.as_str())
    }
}

// ----------------------------------------------------------------------------

impl Default for Uri {
    #[inline]
    fn default() -> Self {
        Uri {
            path: String::from("/"),
            query: Query::default(),
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_path(&self.path))?;

        // Write query string, if any
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }

        // No errors occurred
        Ok(())
    }
}
