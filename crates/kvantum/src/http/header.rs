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

//! HTTP header.

use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl AsRef<str> for Header {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------

impl FromStr for Header {
    type Err = Error;

    /// Attempts to parse a header name, ignoring case.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Header`], if the string does not match
    /// one of the known headers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::http::Header;
    ///
    /// // Parse header from string
    /// let header: Header = "content-type".parse()?;
    /// assert_eq!(header, Header::ContentType);
    /// # Ok(())
    /// # }
    /// ```
    fn from_str(value: &str) -> Result<Self> {
        Header::ALL
            .iter()
            .find(|header| header.name().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| Error::Header(value.to_string()))
    }
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines and implements HTTP headers.
macro_rules! define_and_impl_header {
    (
        $(
            $(#[$_:meta])*
            $group:ident:
            {
                $(
                    $(#[$comment:meta])*
                    $name:ident = $header:expr
                ),+
                $(,)?
            }
        )+
    ) => {
        /// HTTP header.
        ///
        /// Only headers that handlers and middlewares of the dispatch core
        /// inspect or emit are listed. Headers that may legally appear more
        /// than once, like [`Header::SetCookie`], are stored once.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Header {
            $(
                $(
                    $(#[$comment])*
                    $name,
                )+
            )+
        }

        impl Header {
            /// All known headers, in declaration order.
            pub const ALL: &[Header] = &[$($(Header::$name),+),+];

            /// Returns the header name.
            ///
            /// # Examples
            ///
            /// ```
            /// use kvantum::http::Header;
            ///
            /// // Obtain header name
            /// assert_eq!(Header::LastModified.name(), "Last-Modified");
            /// ```
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(
                        $(
                            Header::$name => $header,
                        )+
                    )+
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------

define_and_impl_header! {

    /// Request headers
    Request: {
        /// Accept
        Accept = "Accept",
        /// Authorization
        Authorization = "Authorization",
        /// Cookie
        Cookie = "Cookie",
        /// Host
        Host = "Host",
        /// If-Modified-Since
        IfModifiedSince = "If-Modified-Since",
        /// Referer
        Referer = "Referer",
        /// User-Agent
        UserAgent = "User-Agent",
        /// X-Forwarded-Proto
        XForwardedProto = "X-Forwarded-Proto",
    }

    /// Response headers
    Response: {
        /// Cache-Control
        CacheControl = "Cache-Control",
        /// Content-Length
        ContentLength = "Content-Length",
        /// Content-Type
        ContentType = "Content-Type",
        /// Date
        Date = "Date",
        /// Last-Modified
        LastModified = "Last-Modified",
        /// Location
        Location = "Location",
        /// Server
        Server = "Server",
        /// Set-Cookie
        SetCookie = "Set-Cookie",
        /// Strict-Transport-Security
        StrictTransportSecurity = "Strict-Transport-Security",
    }
}
