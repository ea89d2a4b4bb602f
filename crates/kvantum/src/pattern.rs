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

//! Filter patterns.
//!
//! A filter is a path template with `{name}` placeholders, like
//! `/plot/{world}/{id}`. It's compiled once into a sequence of literal and
//! capture steps, which is then walked against request paths. A capture
//! binds the shortest value that lets the rest of the pattern match, stops
//! at `/`, and may be empty.
//!
//! Placeholders written as `{name?}` or `{name=default}` are optional. An
//! optional placeholder may be left out together with the `/` or `.` in
//! front of it, so `/news/{page=0}` matches `/news` as well as `/news/2`.
//! Absent optional variables are bound to their default, or left unbound.

use std::{fmt, iter};
use tracing::trace;

mod error;
mod file;
mod token;
mod variables;

pub use error::{Error, Result};
pub use file::{FilePattern, Template, EXTENSION, FILE, FOLDER};
pub use variables::Variables;

use token::{normalize, strip_leading, tokenize, Token};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Attempt conversion into [`Pattern`].
///
/// Builders accept anything implementing this trait, which allows to pass
/// strings as well as precompiled patterns, and defer compilation errors to
/// the point where the handler is built.
pub trait TryIntoPattern {
    /// Attempts to convert into a pattern.
    fn try_into_pattern(self) -> Result<Pattern>;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Compiled filter pattern.
///
/// Compiled patterns are immutable, and can be shared across threads freely.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::pattern::{Pattern, Variables};
///
/// // Compile pattern
/// let pattern = Pattern::new("/plot/{world}/{id}")?;
///
/// // Match paths
/// assert_eq!(
///     pattern.matches("/plot/survival/12"),
///     Some(Variables::from_iter([("world", "survival"), ("id", "12")]))
/// );
/// assert_eq!(pattern.matches("/plot/survival"), None);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Filter as given.
    raw: String,
    /// Compiled steps.
    steps: Vec<Step>,
}

/// Matching step.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    /// Exact text.
    Literal(String),
    /// Named capture.
    Capture(Capture),
}

/// Named capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Capture {
    /// Variable name.
    name: String,
    /// Prefer the longest admissible value.
    greedy: bool,
    /// Allow the value to contain `/`.
    spans: bool,
    /// Allow the capture to be absent.
    optional: bool,
    /// Value bound when absent.
    default: Option<String>,
    /// Delimiter left out together with an absent capture.
    delimiter: Option<char>,
}

/// Pattern walk over a single input.
///
/// Whether the remaining steps match from a given offset doesn't depend on
/// how the input before it was split, so failed positions are remembered.
/// This bounds a walk by the number of steps times the squared length of the
/// input, however the captures are arranged.
struct Walk<'s, 'p> {
    /// Compiled steps.
    steps: &'s [Step],
    /// Input path.
    input: &'p str,
    /// Failed positions, by step and offset.
    failed: Vec<bool>,
    /// Captured values, in order.
    captured: Vec<(&'s Capture, &'p str)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Pattern {
    /// Compiles a filter pattern.
    ///
    /// # Errors
    ///
    /// This method returns [`Error`], if a placeholder is unbalanced, nested,
    /// empty, or its name is used twice.
    pub fn new(raw: &str) -> Result<Self> {
        Self::compile(raw, Capture::segment)
    }

    /// Compiles a filter pattern, choosing capture behavior by name.
    pub(crate) fn compile<F>(raw: &str, capture: F) -> Result<Self>
    where
        F: Fn(String) -> Capture,
    {
        let mut steps: Vec<Step> = Vec::new();
        for token in tokenize(normalize(raw))? {
            let step = match token {
                Token::Literal(value) => Step::Literal(value),
                Token::Variable(name) => Step::Capture(capture(name)),
                Token::Optional { name, default } => {
                    let mut optional = Capture {
                        optional: true,
                        default,
                        ..capture(name)
                    };

                    // Move the preceding delimiter into the capture
                    if let Some(Step::Literal(literal)) = steps.last_mut() {
                        if literal.ends_with(['/', '.']) {
                            optional.delimiter = literal.pop();
                            if literal.is_empty() {
                                steps.pop();
                            }
                        }
                    }
                    Step::Capture(optional)
                }
            };
            steps.push(step);
        }

        trace!(pattern = raw, ?steps, "compiled pattern");
        Ok(Self { raw: raw.to_string(), steps })
    }

    /// Matches the given path, returning the captured variables.
    ///
    /// A single leading `./` or `/`, a single trailing `/` and the query
    /// string are ignored, so `/x/`, `x` and `./x?y=1` all match the pattern
    /// `/x`. A trailing `/` is only dropped when the path doesn't match with
    /// it, so that `/user/` binds an empty value to `/user/{name}`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::pattern::Pattern;
    ///
    /// // Compile pattern without placeholders
    /// let pattern = Pattern::new("/")?;
    ///
    /// // An empty set of variables is still a match
    /// assert!(pattern.matches("/").is_some_and(|vars| vars.is_empty()));
    /// assert!(pattern.matches("/x").is_none());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Variables> {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        let path = strip_leading(path);

        // Retry without trailing slash, if there is one
        iter::once(path)
            .chain(path.strip_suffix('/'))
            .find_map(|path| Walk::new(&self.steps, path).run())
    }

    /// Returns the pattern as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns an iterator over the variable names, in order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            Step::Capture(capture) => Some(capture.name.as_str()),
            Step::Literal(_) => None,
        })
    }
}

impl Capture {
    /// Creates a capture confined to a path segment.
    pub(crate) fn segment(name: String) -> Self {
        Self {
            name,
            greedy: false,
            spans: false,
            optional: false,
            default: None,
            delimiter: None,
        }
    }

    /// Creates a capture that prefers the longest value within a segment.
    pub(crate) fn greedy(name: String) -> Self {
        Self { greedy: true, ..Self::segment(name) }
    }

    /// Creates a capture that may cover several segments.
    pub(crate) fn spanning(name: String) -> Self {
        Self { greedy: true, spans: true, ..Self::segment(name) }
    }
}

impl<'s, 'p> Walk<'s, 'p> {
    /// Creates a walk of the steps over the input.
    fn new(steps: &'s [Step], input: &'p str) -> Self {
        Self {
            steps,
            input,
            failed: vec![false; steps.len() * (input.len() + 1)],
            captured: Vec::new(),
        }
    }

    /// Runs the walk, returning the captured variables on success.
    ///
    /// Empty values of optional captures count as absent, and are replaced
    /// by the default, if any.
    fn run(mut self) -> Option<Variables> {
        if !self.step(0, 0) {
            return None;
        }

        // Resolve absent optional captures
        let mut variables = Variables::new();
        for (capture, value) in self.captured {
            if !capture.optional || !value.is_empty() {
                variables.insert(&capture.name, value);
            } else if let Some(default) = &capture.default {
                variables.insert(&capture.name, default);
            }
        }
        Some(variables)
    }

    /// Matches the steps from the given index against the input from the
    /// given offset.
    fn step(&mut self, index: usize, offset: usize) -> bool {
        let steps = self.steps;
        let Some(step) = steps.get(index) else {
            return offset == self.input.len();
        };

        // Skip positions known to fail
        let slot = index * (self.input.len() + 1) + offset;
        if self.failed[slot] {
            return false;
        }

        let input = self.input;
        let matched = match step {
            Step::Literal(literal) => {
                input[offset..].starts_with(literal.as_str())
                    && self.step(index + 1, offset + literal.len())
            }
            Step::Capture(capture) => self.capture(capture, index, offset),
        };
        if !matched {
            self.failed[slot] = true;
        }
        matched
    }

    /// Matches an optional capture with its delimiter, or leaves it out.
    fn capture(
        &mut self, capture: &'s Capture, index: usize, offset: usize,
    ) -> bool {
        let Some(delimiter) = capture.delimiter else {
            return self.split(capture, index, offset);
        };

        // Try the capture with its delimiter first
        let input = self.input;
        if input[offset..].starts_with(delimiter) {
            let start = offset + delimiter.len_utf8();
            if self.split(capture, index, start) {
                return true;
            }
        }

        // Leave out capture and delimiter
        self.captured.push((capture, ""));
        if self.step(index + 1, offset) {
            return true;
        }
        self.captured.pop();
        false
    }

    /// Tries each admissible value for the capture, backtracking.
    ///
    /// Lazy captures try their shortest value first, greedy captures their
    /// longest, and the first complete walk wins.
    fn split(
        &mut self, capture: &'s Capture, index: usize, offset: usize,
    ) -> bool {
        let input = self.input;
        let input = &input[offset..];
        let limit = if capture.spans {
            input.len()
        } else {
            input.find('/').unwrap_or(input.len())
        };

        // Collect admissible split points on character boundaries
        let iter = input[..limit].char_indices().map(|(at, _)| at);
        let mut ends = iter.chain(iter::once(limit)).collect::<Vec<_>>();
        if capture.greedy {
            ends.reverse();
        }

        // Try each split, skipping those the next literal can't follow
        let steps = self.steps;
        let next = steps.get(index + 1);
        for end in ends {
            let (value, tail) = input.split_at(end);
            if let Some(Step::Literal(literal)) = next {
                if !tail.starts_with(literal.as_str()) {
                    continue;
                }
            }
            self.captured.push((capture, value));
            if self.step(index + 1, offset + end) {
                return true;
            }
            self.captured.pop();
        }
        false
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryIntoPattern for Pattern {
    #[inline]
    fn try_into_pattern(self) -> Result<Pattern> {
        Ok(self)
    }
}

impl TryIntoPattern for &str {
    #[inline]
    fn try_into_pattern(self) -> Result<Pattern> {
        Pattern::new(self)
    }
}

impl TryIntoPattern for String {
    #[inline]
    fn try_into_pattern(self) -> Result<Pattern> {
        Pattern::new(&self)
    }
}

impl<T> TryIntoPattern for Result<T>
where
    T: TryIntoPattern,
{
    #[inline]
    fn try_into_pattern(self) -> Result<Pattern> {
        self.and_then(TryIntoPattern::try_into_pattern)
    }
}

// ----------------------------------------------------------------------------

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn vars<const N: usize>(pairs: [(&str, &str); N]) -> Option<Variables> {
        Some(Variables::from_iter(pairs))
    }

    #[test]
    fn matches_substituted_paths() {
        for (pattern, path, expected) in [
            ("/plot/{world}/{id}", "/plot/survival/12", vars([("world", "survival"), ("id", "12")])),
            ("/plot/{world}/{id}", "plot/creative/-3", vars([("world", "creative"), ("id", "-3")])),
            ("/user/{name}", "/user/", vars([("name", "")])),
            ("/user/{name}", "/user/bob/", vars([("name", "bob")])),
            ("/{a}-{b}", "/x-y-z", vars([("a", "x"), ("b", "y-z")])),
            ("/{a}{b}", "/xy", vars([("a", ""), ("b", "xy")])),
            ("/", "/", vars([])),
            ("/static", "./static/", vars([])),
            ("/s/{id}", "/s/7?id=8", vars([("id", "7")])),
            ("/{a}/{b}", "//x", vars([("a", ""), ("b", "x")])),
            ("/{a}/{b}", "./a/b/", vars([("a", "a"), ("b", "b")])),
            ("/{a}/{b}", "/a/b//", None),
        ] {
            assert_eq!(
                Pattern::new(pattern).ok().and_then(|p| p.matches(path)),
                expected,
                "{pattern:?} against {path:?}"
            );
        }
    }

    #[test]
    fn rejects_misaligned_paths() {
        for (pattern, path) in [
            ("/plot/{world}/{id}", "/plot/survival"),
            ("/plot/{world}/{id}", "/plot/survival/12/extra"),
            ("/plot/{world}", "/Plot/survival"),
            ("/user/{name}", "/user/a/b"),
            ("/", "/x"),
        ] {
            let pattern = Pattern::new(pattern).expect("valid pattern");
            assert_eq!(pattern.matches(path), None, "{pattern} against {path:?}");
        }
    }

    #[test]
    fn matches_optional_variables() {
        for (pattern, path, expected) in [
            ("/news/{page=0}", "/news", vars([("page", "0")])),
            ("/news/{page=0}", "/news/", vars([("page", "0")])),
            ("/news/{page=0}", "/news/foo", vars([("page", "foo")])),
            ("/news/{page=0}", "/news/foo/bar", None),
            ("/news/{page=0}", "/newsfoo", None),
            ("/user/{name}/posts/{page?}", "/user/bob/posts", vars([("name", "bob")])),
            ("/user/{name}/posts/{page?}", "/user/bob/posts/10", vars([("name", "bob"), ("page", "10")])),
            ("/user/{name}/posts/{page?}", "/user/bob/posts/a/b", None),
            ("/{file}.{format=html}", "/index", vars([("file", "index"), ("format", "html")])),
            ("/{file}.{format=html}", "/index.json", vars([("file", "index"), ("format", "json")])),
            ("/{tab?}", "/", vars([])),
        ] {
            assert_eq!(
                Pattern::new(pattern).ok().and_then(|p| p.matches(path)),
                expected,
                "{pattern:?} against {path:?}"
            );
        }
    }

    #[test]
    fn matching_time_is_bounded() {
        let pattern = Pattern::new("/{a}-{b}-{c}-{d}-{e}").expect("valid pattern");
        let path = format!("/{}!/x", "-".repeat(1000));

        let start = Instant::now();
        assert_eq!(pattern.matches(&path), None);
        assert!(start.elapsed() < Duration::from_secs(10));

        // Same shape, but matching
        let path = format!("/{}x", "-".repeat(1000));
        let vars = pattern.matches(&path).expect("match");
        assert_eq!(vars.get("a"), Some(""));
        assert_eq!(vars.get("e").map(str::len), Some(997));
    }

    #[test]
    fn matches_multibyte_values() {
        let pattern = Pattern::new("/w/{word}.txt").expect("valid pattern");
        assert_eq!(pattern.matches("/w/größe.txt"), vars([("word", "größe")]));
    }

    #[test]
    fn keeps_pattern_as_given() {
        let pattern = Pattern::new("/plot/{world}/{id}/").expect("valid pattern");
        assert_eq!(pattern.to_string(), "/plot/{world}/{id}/");
        assert_eq!(pattern.variables().collect::<Vec<_>>(), ["world", "id"]);
    }

    #[test]
    fn defers_errors_through_conversion() {
        assert!("/{a".try_into_pattern().is_err());
        assert!(Pattern::new("/{a}").try_into_pattern().is_ok());
    }
}
