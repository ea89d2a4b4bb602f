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

//! HTTP response body.

use std::fmt;
use std::io::{self, Read};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// HTTP response body.
///
/// Small payloads are kept in memory, whereas large files are handed out as
/// a reader of known length, so they can be copied to the connection in
/// chunks.
pub enum Body {
    /// In-memory body.
    Bytes(Vec<u8>),
    /// Streamed body.
    Stream {
        /// Reader producing the body.
        reader: Box<dyn Read + Send>,
        /// Number of bytes the reader yields.
        length: u64,
    },
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Body {
    /// Creates a streamed body.
    pub fn stream<R>(reader: R, length: u64) -> Self
    where
        R: Read + Send + 'static,
    {
        Body::Stream { reader: Box::new(reader), length }
    }

    /// Returns the length of the body in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::Stream { length, .. } => *length,
        }
    }

    /// Returns whether the body is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the body is streamed.
    #[inline]
    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream { .. })
    }

    /// Consumes the body, reading a stream to its end.
    ///
    /// # Errors
    ///
    /// This method returns [`io::Error`], if a streamed body can't be read.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use std::io::Cursor;
    /// use kvantum::http::Body;
    ///
    /// // Create streamed body and read it
    /// let body = Body::stream(Cursor::new(b"chunk".to_vec()), 5);
    /// assert_eq!(body.into_bytes()?, b"chunk");
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self {
            Body::Bytes(bytes) => Ok(bytes),
            Body::Stream { mut reader, length } => {
                let mut bytes =
                    Vec::with_capacity(usize::try_from(length).unwrap_or(0));
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Body {
    #[inline]
    fn default() -> Self {
        Body::Bytes(Vec::new())
    }
}

impl From<Vec<u8>> for Body {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Body::Bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    #[inline]
    fn from(content: String) -> Self {
        Body::Bytes(content.into_bytes())
    }
}

impl From<&str> for Body {
    #[inline]
    fn from(content: &str) -> Self {
        Body::Bytes(content.as_bytes().to_vec())
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => {
                f.debug_tuple("Bytes").field(&bytes.len()).finish()
            }
            Body::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish()
            }
        }
    }
}
