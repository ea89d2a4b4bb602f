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

//! File extensions.

use std::fmt;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// File extension with its content type.
///
/// Static file views only serve files whose extension is whitelisted, and
/// answer with the content type of the matching entry.
///
/// # Examples
///
/// ```
/// use kvantum::handler::view::Extension;
///
/// // Look up extension
/// let extension = Extension::from_name("HTM").unwrap();
/// assert_eq!(extension, Extension::HTML);
/// assert_eq!(extension.content_type(), "text/html; charset=utf-8");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    /// Accepted names, the first being canonical.
    names: &'static [&'static str],
    /// Content type.
    content_type: &'static str,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Extension {
    /// HTML documents.
    pub const HTML: Self = Self::new(&["html", "htm"], "text/html; charset=utf-8");
    /// Stylesheets.
    pub const CSS: Self = Self::new(&["css"], "text/css");
    /// Scripts.
    pub const JS: Self = Self::new(&["js", "mjs"], "application/javascript");
    /// JSON documents.
    pub const JSON: Self = Self::new(&["json"], "application/json");
    /// XML documents.
    pub const XML: Self = Self::new(&["xml"], "application/xml");
    /// Plain text.
    pub const TXT: Self = Self::new(&["txt"], "text/plain; charset=utf-8");
    /// PNG images.
    pub const PNG: Self = Self::new(&["png"], "image/png");
    /// JPEG images.
    pub const JPEG: Self = Self::new(&["jpg", "jpeg"], "image/jpeg");
    /// GIF images.
    pub const GIF: Self = Self::new(&["gif"], "image/gif");
    /// SVG images.
    pub const SVG: Self = Self::new(&["svg"], "image/svg+xml");
    /// Icons.
    pub const ICO: Self = Self::new(&["ico"], "image/x-icon");
    /// WebP images.
    pub const WEBP: Self = Self::new(&["webp"], "image/webp");
    /// Web fonts.
    pub const WOFF2: Self = Self::new(&["woff2"], "font/woff2");
    /// PDF documents.
    pub const PDF: Self = Self::new(&["pdf"], "application/pdf");
    /// MP4 videos.
    pub const MP4: Self = Self::new(&["mp4"], "video/mp4");
    /// ZIP archives, served as downloads.
    pub const ZIP: Self = Self::new(&["zip"], "application/zip");

    /// All built-in extensions.
    pub const ALL: &[Self] = &[
        Self::HTML, Self::CSS, Self::JS, Self::JSON, Self::XML, Self::TXT,
        Self::PNG, Self::JPEG, Self::GIF, Self::SVG, Self::ICO, Self::WEBP,
        Self::WOFF2, Self::PDF, Self::MP4, Self::ZIP,
    ];

    /// Creates an extension.
    #[must_use]
    pub const fn new(
        names: &'static [&'static str], content_type: &'static str,
    ) -> Self {
        Self { names, content_type }
    }

    /// Returns the built-in extension with the given name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|ext| ext.matches(name)).copied()
    }

    /// Returns whether the given name denotes this extension, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|value| value.eq_ignore_ascii_case(name))
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.names.first().copied().unwrap_or_default()
    }

    /// Returns all accepted names.
    #[must_use]
    pub const fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// Returns the content type.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
