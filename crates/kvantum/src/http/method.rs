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

//! HTTP method.

use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Method {
    /// Returns whether the method is expected to carry a request body.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::http::Method;
    ///
    /// // Check whether methods carry a body
    /// assert!(Method::Post.has_body());
    /// assert!(!Method::Head.has_body());
    /// ```
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl AsRef<str> for Method {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines the request methods a handler can be restricted to.
macro_rules! define_and_impl_method {
    (
        $(
            $(#[$comment:meta])*
            $name:ident = $method:expr
        ),+
        $(,)?
    ) => {
        /// HTTP method.
        ///
        /// Handlers that accept any method leave their filter unset instead
        /// of relying on a wildcard variant.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Method {
            $(
                $(#[$comment])*
                $name,
            )+
        }

        impl Method {
            /// All known methods, in declaration order.
            pub const ALL: &[Method] = &[$(Method::$name),+];

            /// Returns the method name.
            ///
            /// # Examples
            ///
            /// ```
            /// use kvantum::http::Method;
            ///
            /// // Obtain method name
            /// assert_eq!(Method::Patch.name(), "PATCH");
            /// ```
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(
                        Method::$name => $method,
                    )+
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------

impl FromStr for Method {
    type Err = Error;

    /// Attempts to parse a method, ignoring case.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Method`], if the string does not match
    /// one of the known methods.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::http::Method;
    ///
    /// // Parse method from string
    /// let method: Method = "delete".parse()?;
    /// assert_eq!(method, Method::Delete);
    /// # Ok(())
    /// # }
    /// ```
    fn from_str(value: &str) -> Result<Self> {
        Method::ALL
            .iter()
            .find(|method| method.name().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| Error::Method(value.to_string()))
    }
}

// ----------------------------------------------------------------------------

define_and_impl_method! {
    /// GET method
    Get = "GET",
    /// HEAD method
    Head = "HEAD",
    /// POST method
    Post = "POST",
    /// PUT method
    Put = "PUT",
    /// PATCH method
    Patch = "PATCH",
    /// DELETE method
    Delete = "DELETE",
    /// OPTIONS method
    Options = "OPTIONS",
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods_ignoring_case() {
        for (value, method) in [
            ("GET", Method::Get),
            ("head", Method::Head),
            ("Post", Method::Post),
            ("pAtCh", Method::Patch),
        ] {
            assert_eq!(value.parse::<Method>().ok(), Some(method));
        }
    }

    #[test]
    fn rejects_unknown_methods() {
        assert!(matches!(
            "BREW".parse::<Method>(),
            Err(Error::Method(value)) if value == "BREW"
        ));
    }
}
