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

//! Per-request metadata.
//!
//! Keys used by the dispatch core itself are exported as constants, so that
//! custom handlers and middlewares can read and write the same entries.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Variables captured by the matching pattern.
pub const VARIABLES: &str = "variables";

/// Identifier of the alternate outcome to run instead of generation.
pub const ALTERNATE_OUTCOME: &str = "alternateOutcome";

/// Path to re-route to when the handler produced no response.
pub const INTERNAL_REDIRECT: &str = "internalRedirect";

/// Resolved file path of a static file.
pub const FILE: &str = "file";

/// Length of a static file in bytes.
pub const FILE_LENGTH: &str = "file_length";

/// Extension descriptor of a static file.
pub const EXTENSION: &str = "extension";

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Per-request metadata.
///
/// A string-keyed bag of typed values. Lookups name the expected type, and
/// return nothing when the key is absent or holds a value of another type.
///
/// # Examples
///
/// ```
/// use kvantum::http::Meta;
///
/// // Create metadata and store value
/// let mut meta = Meta::new();
/// meta.insert("file_length", 42_u64);
///
/// assert_eq!(meta.get::<u64>("file_length"), Some(&42));
/// assert_eq!(meta.get::<String>("file_length"), None);
/// ```
#[derive(Default)]
pub struct Meta {
    /// Values by key.
    inner: HashMap<String, Box<dyn Any + Send + Sync>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Meta {
    /// Creates an empty metadata bag.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous value for the key.
    pub fn insert<K, T>(&mut self, key: K, value: T)
    where
        K: Into<String>,
        T: Any + Send + Sync,
    {
        self.inner.insert(key.into(), Box::new(value));
    }

    /// Returns a reference to the value, if present with the given type.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<&T>
    where
        T: Any,
    {
        self.inner.get(key).and_then(|value| (**value).downcast_ref())
    }

    /// Returns a mutable reference to the value, if present with the given type.
    pub fn get_mut<T>(&mut self, key: &str) -> Option<&mut T>
    where
        T: Any,
    {
        self.inner
            .get_mut(key)
            .and_then(|value| (**value).downcast_mut())
    }

    /// Removes and returns the value, if present with the given type.
    ///
    /// Values of another type are left in place.
    pub fn remove<T>(&mut self, key: &str) -> Option<T>
    where
        T: Any,
    {
        self.get::<T>(key)?;
        self.inner
            .remove(key)
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Returns whether a value is stored for the key.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over all keys.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

#[allow(clippy::must_use_candidate)]
impl Meta {
    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut keys = self.inner.keys().collect::<Vec<_>>();
        keys.sort();
        f.debug_set().entries(keys).finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_keeps_values_of_other_types() {
        let mut meta = Meta::new();
        meta.insert(FILE_LENGTH, 7_u64);

        assert_eq!(meta.remove::<String>(FILE_LENGTH), None);
        assert!(meta.contains(FILE_LENGTH));
        assert_eq!(meta.remove::<u64>(FILE_LENGTH), Some(7));
        assert!(meta.is_empty());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut meta = Meta::new();
        meta.insert(INTERNAL_REDIRECT, String::from("/a"));
        if let Some(path) = meta.get_mut::<String>(INTERNAL_REDIRECT) {
            path.push_str("/b");
        }
        assert_eq!(
            meta.get::<String>(INTERNAL_REDIRECT).map(String::as_str),
            Some("/a/b")
        );
    }
}
