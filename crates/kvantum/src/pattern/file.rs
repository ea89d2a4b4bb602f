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

//! File patterns and file name templates.

use std::fmt;

use super::error::Result;
use super::token::{tokenize, Token};
use super::{Capture, Pattern, TryIntoPattern, Variables};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Variable for the directory part of a path.
pub const FOLDER: &str = "folder";

/// Variable for the file name without extension.
pub const FILE: &str = "file";

/// Variable for the extension.
pub const EXTENSION: &str = "extension";

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// File-oriented filter pattern.
///
/// Works like [`Pattern`], except for two well-known variables: `{folder}`
/// may cover several path segments, and `{file}` binds the longest value, so
/// the extension is whatever follows the last dot.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::pattern::FilePattern;
///
/// // Compile file pattern
/// let pattern = FilePattern::new("/assets/{folder}/{file}.{extension}")?;
///
/// // Match nested path
/// let vars = pattern.matches("/assets/img/icons/logo.min.svg").unwrap();
/// assert_eq!(vars.get("folder"), Some("img/icons"));
/// assert_eq!(vars.get("file"), Some("logo.min"));
/// assert_eq!(vars.get("extension"), Some("svg"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePattern {
    /// Compiled pattern.
    inner: Pattern,
}

/// File name template.
///
/// Renders a file name from captured variables by replacing `{name}`
/// placeholders, e.g. `{file}.{extension}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    /// Template as given.
    raw: String,
    /// Tokens.
    tokens: Vec<Token>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl FilePattern {
    /// Compiles a file pattern.
    ///
    /// # Errors
    ///
    /// This method returns [`Error`][], if the pattern is malformed.
    ///
    /// [`Error`]: super::Error
    pub fn new(raw: &str) -> Result<Self> {
        let inner = Pattern::compile(raw, |name| match name.as_str() {
            FOLDER => Capture::spanning(name),
            FILE => Capture::greedy(name),
            _ => Capture::segment(name),
        })?;
        Ok(Self { inner })
    }

    /// Matches the given path, returning the captured variables.
    #[inline]
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Variables> {
        self.inner.matches(path)
    }

    /// Returns the pattern as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns a template that renders matched paths back.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::pattern::FilePattern;
    ///
    /// // Compile file pattern and render template
    /// let pattern = FilePattern::new("{folder}/{file}.{extension}")?;
    /// let vars = pattern.matches("css/main.css").unwrap();
    /// assert_eq!(pattern.template()?.render(&vars).as_deref(), Some("css/main.css"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn template(&self) -> Result<Template> {
        Template::new(self.inner.as_str())
    }

    /// Returns the compiled pattern.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Pattern {
        self.inner
    }
}

impl Template {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// This method returns [`Error`][], if the template is malformed.
    ///
    /// [`Error`]: super::Error
    pub fn new(raw: &str) -> Result<Self> {
        let tokens = tokenize(raw)?;
        Ok(Self { raw: raw.to_string(), tokens })
    }

    /// Renders the template, if every placeholder has a value.
    ///
    /// Optional placeholders render their value or default, and are left
    /// empty otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvantum::pattern::{Template, Variables};
    ///
    /// // Render default template
    /// let template = Template::default();
    /// let vars = Variables::from_iter([("file", "index")]);
    /// assert_eq!(template.render(&vars), None);
    ///
    /// let vars = Variables::from_iter([("file", "index"), ("extension", "html")]);
    /// assert_eq!(template.render(&vars).as_deref(), Some("index.html"));
    /// ```
    #[must_use]
    pub fn render(&self, variables: &Variables) -> Option<String> {
        let mut name = String::with_capacity(self.raw.len());
        for token in &self.tokens {
            match token {
                Token::Literal(value) => name.push_str(value),
                Token::Variable(key) => name.push_str(variables.get(key)?),
                Token::Optional { name: key, default } => name.push_str(
                    variables
                        .get(key)
                        .or(default.as_deref())
                        .unwrap_or_default(),
                ),
            }
        }
        Some(name)
    }

    /// Returns whether the template has a placeholder for the given variable.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| token.name() == Some(name))
    }

    /// Returns the template as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryIntoPattern for FilePattern {
    #[inline]
    fn try_into_pattern(self) -> Result<Pattern> {
        Ok(self.inner)
    }
}

impl From<FilePattern> for Pattern {
    #[inline]
    fn from(pattern: FilePattern) -> Self {
        pattern.inner
    }
}

// ----------------------------------------------------------------------------

impl Default for Template {
    fn default() -> Self {
        Self {
            raw: String::from("{file}.{extension}"),
            tokens: vec![
                Token::Variable(FILE.to_string()),
                Token::Literal(String::from(".")),
                Token::Variable(EXTENSION.to_string()),
            ],
        }
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_file_paths() {
        let pattern = FilePattern::new("{file}.{extension}").expect("valid");
        for (path, file, extension) in [
            ("/index.html", "index", "html"),
            ("/jquery.min.js", "jquery.min", "js"),
            ("/.html", "", "html"),
        ] {
            let vars = pattern.matches(path).expect("match");
            assert_eq!(vars.get(FILE), Some(file), "{path:?}");
            assert_eq!(vars.get(EXTENSION), Some(extension), "{path:?}");
        }
        assert_eq!(pattern.matches("/a/b.html"), None);
        assert_eq!(pattern.matches("/readme"), None);
    }

    #[test]
    fn folder_spans_segments() {
        let pattern = FilePattern::new("/{folder}/{file}").expect("valid");
        let vars = pattern.matches("/a/b/c").expect("match");
        assert_eq!(vars.get(FOLDER), Some("a/b"));
        assert_eq!(vars.get(FILE), Some("c"));
    }

    #[test]
    fn renders_optional_placeholders() {
        let template = Template::new("{file}{suffix?}.{extension=html}")
            .expect("valid");
        assert!(template.contains("suffix"));
        assert_eq!(
            template.render(&Variables::from_iter([("file", "index")])),
            Some(String::from("index.html"))
        );
        assert_eq!(
            template.render(&Variables::from_iter([
                ("file", "app"),
                ("suffix", ".min"),
                ("extension", "js"),
            ])),
            Some(String::from("app.min.js"))
        );
    }

    #[test]
    fn default_template_parses_identically() {
        assert_eq!(
            Template::new("{file}.{extension}").ok(),
            Some(Template::default())
        );
    }
}
