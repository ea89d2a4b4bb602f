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

//! Request validation.
//!
//! Validators check request parameters before a handler runs. Requests other
//! than POST are checked against their query string, POST requests against
//! the form parameters in their body.

use std::fmt;
use std::result;

use crate::http::{Method, Query, Request};

use super::{Error, Result};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Parameters checked by a validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Query string, for requests other than POST.
    Query,
    /// Form parameters, for POST requests.
    Form,
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Parameter validator.
///
/// Closures taking the parameters and returning the reason for rejection as
/// an error are validators.
pub trait Validator: Send + Sync + 'static {
    /// Checks the parameters, returning the reason for rejection on failure.
    ///
    /// # Errors
    ///
    /// The error is reported to the client as is.
    fn validate(&self, params: &Query) -> result::Result<(), String>;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Validators of a handler.
///
/// # Examples
///
/// ```
/// use kvantum::handler::validation::{Stage, Validators};
/// use kvantum::http::{Method, Query, Request};
///
/// // Create validators requiring an identifier in form submissions
/// let mut validators = Validators::new();
/// validators.add(Stage::Form, |params: &Query| {
///     params.contains("id").then_some(()).ok_or("missing id".to_string())
/// });
///
/// // Validate requests
/// let req = Request::new().method(Method::Post).body("id=7");
/// assert!(validators.validate(&req).is_ok());
///
/// let req = Request::new().method(Method::Post).body("name=steve");
/// assert!(validators.validate(&req).is_err());
///
/// // Query strings aren't checked by form validators
/// let req = Request::new().uri("/?name=steve");
/// assert!(validators.validate(&req).is_ok());
/// ```
#[derive(Default)]
pub struct Validators {
    /// Validators with their stage, in order.
    inner: Vec<(Stage, Box<dyn Validator>)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Validators {
    /// Creates an empty set of validators.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validator for the given stage.
    pub fn add<V>(&mut self, stage: Stage, validator: V)
    where
        V: Validator,
    {
        self.inner.push((stage, Box::new(validator)));
    }

    /// Runs the validators for the request's stage in order.
    ///
    /// Form parameters are parsed from the body, which is read as UTF-8 with
    /// invalid sequences replaced.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Invalid`] with the reason given by the
    /// first validator that rejects the request.
    pub fn validate(&self, req: &Request) -> Result {
        if self.inner.is_empty() {
            return Ok(());
        }

        // Select parameters by method
        let form;
        let (stage, params) = if req.method == Method::Post {
            form = Query::from(String::from_utf8_lossy(&req.body).as_ref());
            (Stage::Form, &form)
        } else {
            (Stage::Query, &req.uri.query)
        };

        // Run validators of the stage, stopping at the first rejection
        self.inner
            .iter()
            .filter(|(other, _)| *other == stage)
            .try_for_each(|(_, validator)| validator.validate(params))
            .map_err(Error::Invalid)
    }
}

#[allow(clippy::must_use_candidate)]
impl Validators {
    /// Returns the number of validators.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any validators.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.iter().map(|(stage, _)| stage))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F> Validator for F
where
    F: Fn(&Query) -> result::Result<(), String> + Send + Sync + 'static,
{
    #[inline]
    fn validate(&self, params: &Query) -> result::Result<(), String> {
        self(params)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn require(key: &'static str) -> impl Validator {
        move |params: &Query| {
            if params.contains(key) {
                Ok(())
            } else {
                Err(format!("missing parameter: {key}"))
            }
        }
    }

    #[test]
    fn checks_query_for_non_post_requests() {
        let mut validators = Validators::new();
        validators.add(Stage::Query, require("page"));
        validators.add(Stage::Form, require("token"));

        let req = Request::new().uri("/news?page=2");
        assert!(validators.validate(&req).is_ok());

        let req = Request::new().method(Method::Delete).uri("/news");
        assert!(matches!(
            validators.validate(&req),
            Err(Error::Invalid(reason)) if reason == "missing parameter: page"
        ));
    }

    #[test]
    fn checks_form_for_post_requests() {
        let mut validators = Validators::new();
        validators.add(Stage::Query, require("page"));
        validators.add(Stage::Form, require("token"));

        let req = Request::new()
            .method(Method::Post)
            .uri("/news")
            .body("token=a%20b");
        assert!(validators.validate(&req).is_ok());

        let req = Request::new().method(Method::Post).uri("/news?token=1");
        assert!(matches!(
            validators.validate(&req),
            Err(Error::Invalid(reason)) if reason == "missing parameter: token"
        ));
    }

    #[test]
    fn stops_at_first_rejection() {
        let mut validators = Validators::new();
        validators.add(Stage::Query, require("a"));
        validators.add(Stage::Query, require("b"));
        assert_eq!(validators.len(), 2);

        let req = Request::new().uri("/?c=1");
        assert!(matches!(
            validators.validate(&req),
            Err(Error::Invalid(reason)) if reason == "missing parameter: a"
        ));
    }
}
