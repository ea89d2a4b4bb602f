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

//! Request handlers.

use std::{any, fmt};
use tracing::debug;
use uuid::Uuid;

use super::http::{Method, Request, Response, ResponseExt, Status};
use super::middleware::Populator;

mod error;
mod not_found;
pub mod outcome;
mod redirect;
pub mod validation;
pub mod view;

pub use error::{Error, Result};
pub use not_found::NotFound;
pub use outcome::{Outcome, Outcomes};
pub use redirect::HttpsRedirect;
pub use validation::{Stage, Validator, Validators};
pub use view::{Resolver, StaticFiles, View};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Request handler.
///
/// A handler decides whether it's responsible for a request through
/// [`RequestHandler::matches`], and produces the response through
/// [`RequestHandler::generate`]. Both take the request mutably, as matching
/// attaches the captured variables and other metadata for generation to use.
///
/// Handlers are registered with a [`Router`][] once, and then shared between
/// all threads dispatching requests, which is why they must be [`Send`] and
/// [`Sync`] and must not keep per-request state.
///
/// Dispatching goes through [`handle`][], which runs the handler's
/// middlewares before generating the response.
///
/// [`Router`]: crate::router::Router
/// [`handle`]: #method.handle
pub trait RequestHandler: Send + Sync + 'static {
    /// Returns the identifier, unique per instance.
    fn id(&self) -> Uuid;

    /// Returns the name used in logs. Names need not be unique.
    fn name(&self) -> &str;

    /// Returns the filter, which is checked for duplicates on registration.
    fn filter(&self) -> &str;

    /// Returns the accepted method, or `None` for any method.
    fn method(&self) -> Option<Method> {
        None
    }

    /// Returns the type name used when dumping registered handlers.
    fn kind(&self) -> &'static str {
        any::type_name::<Self>()
    }

    /// Returns whether the handler is responsible for the request.
    ///
    /// Implementations may attach metadata to the request even if they end
    /// up returning `false`, so only the return value is authoritative.
    fn matches(&self, req: &mut Request) -> Result<bool>;

    /// Generates the response for a matched request.
    fn generate(&self, req: &mut Request) -> Result<Response>;

    /// Returns whether the handler must only be served over HTTPS.
    fn force_https(&self) -> bool {
        false
    }

    /// Returns the registered alternate outcomes, if any.
    fn outcomes(&self) -> Option<&Outcomes> {
        None
    }

    /// Returns the middleware populator, if any.
    fn populator(&self) -> Option<&Populator> {
        None
    }

    /// Returns the request validators, if any.
    fn validators(&self) -> Option<&Validators> {
        None
    }
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl dyn RequestHandler {
    /// Handles a matched request.
    ///
    /// The request's parameters are validated first, and a request rejected
    /// by a validator is answered with [`Status::BadRequest`] and the reason.
    /// Then, a fresh middleware queue is generated and run. If a middleware
    /// breaks the chain, no response is produced. Otherwise, the alternate
    /// outcome selected on the request is invoked, or the response is
    /// generated if none was selected.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::UnregisteredOutcome`], if the selected
    /// alternate outcome is unknown to the handler, and passes on errors of
    /// the outcome or [`RequestHandler::generate`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::handler::{RequestHandler, View};
    /// use kvantum::http::{Request, Response, ResponseExt, Status};
    /// use kvantum::middleware::Flow;
    ///
    /// // Create view whose middleware stops the chain
    /// let view = View::builder("/admin", |_: &mut Request| "secret")
    ///     .middleware(|| |_: &mut Request| Flow::Break)
    ///     .build()?;
    ///
    /// // Handle request
    /// let handler: &dyn RequestHandler = &view;
    /// let mut req = Request::new().uri("/admin");
    /// assert!(handler.handle(&mut req)?.is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn handle(&self, req: &mut Request) -> Result<Option<Response>> {
        if let Some(validators) = self.validators() {
            match validators.validate(req) {
                Err(Error::Invalid(reason)) => {
                    debug!(
                        handler = self.name(),
                        reason = reason.as_str(),
                        "request rejected"
                    );
                    let res = Response::from_status(Status::BadRequest);
                    return Ok(Some(res.text(reason)));
                }
                res => res?,
            }
        }

        // Run middlewares, which may drop the request
        if let Some(populator) = self.populator() {
            let mut queue = populator.generate_queue();
            queue.handle(req)?;
            if !queue.finished() {
                debug!(handler = self.name(), "request dropped by middleware");
                return Ok(None);
            }
        }

        // Generate response, unless an alternate outcome was selected
        let Some(identifier) = req.alternate_outcome().map(str::to_owned) else {
            return self.generate(req).map(Some);
        };

        // Invoke alternate outcome, which must be registered
        let outcomes = self.outcomes();
        match outcomes.and_then(|outcomes| outcomes.get(&identifier)) {
            Some(outcome) => {
                debug!(
                    handler = self.name(),
                    outcome = identifier.as_str(),
                    "using alternate outcome"
                );
                outcome.invoke(req, self).map(Some)
            }
            None => Err(Error::UnregisteredOutcome {
                handler: self.name().to_string(),
                outcome: identifier,
            }),
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for dyn RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("name", &self.name())
            .field("id", &self.id())
            .field("filter", &self.filter())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, Query};
    use crate::middleware::Flow;

    fn body(res: Response) -> String {
        let bytes = res.body.into_bytes().expect("in-memory body");
        String::from_utf8(bytes).expect("utf-8 body")
    }

    #[test]
    fn generates_when_chain_finishes() {
        let view = View::builder("/a", |_: &mut Request| "generated")
            .middleware(|| |_: &mut Request| Flow::Continue)
            .build()
            .expect("valid view");

        let handler: &dyn RequestHandler = &view;
        let res = handler.handle(&mut Request::new().uri("/a"));
        assert_eq!(res.ok().flatten().map(body).as_deref(), Some("generated"));
    }

    #[test]
    fn invokes_selected_outcome() {
        let view = View::builder("/a", |_: &mut Request| "generated")
            .middleware(|| {
                |req: &mut Request| {
                    req.use_alternate_outcome("login");
                    Flow::Continue
                }
            })
            .outcome("login", |_: &mut Request, _: &dyn RequestHandler| {
                Response::from_status(Status::Unauthorized)
            })
            .build()
            .expect("valid view");

        let handler: &dyn RequestHandler = &view;
        let res = handler.handle(&mut Request::new().uri("/a"));
        assert_eq!(
            res.ok().flatten().map(|res| res.status),
            Some(Status::Unauthorized)
        );
    }

    #[test]
    fn rejects_unregistered_outcome() {
        let view = View::builder("/a", |_: &mut Request| "generated")
            .middleware(|| {
                |req: &mut Request| {
                    req.use_alternate_outcome("missing");
                    Flow::Continue
                }
            })
            .build()
            .expect("valid view");

        let handler: &dyn RequestHandler = &view;
        assert!(matches!(
            handler.handle(&mut Request::new().uri("/a")),
            Err(Error::UnregisteredOutcome { outcome, .. }) if outcome == "missing"
        ));
    }

    #[test]
    fn rejects_invalid_parameters_before_middlewares() {
        let view = View::builder("/news", |_: &mut Request| "news")
            .validate(Stage::Query, |params: &Query| match params.get("page") {
                Some(page) if page.parse::<u32>().is_ok() => Ok(()),
                _ => Err(String::from("page must be a number")),
            })
            .middleware(|| |_: &mut Request| Flow::Break)
            .build()
            .expect("valid view");

        // Rejected requests never reach the middlewares
        let handler: &dyn RequestHandler = &view;
        let res = handler
            .handle(&mut Request::new().uri("/news?page=two"))
            .ok()
            .flatten()
            .expect("rejection");
        assert_eq!(res.status, Status::BadRequest);
        assert_eq!(body(res), "page must be a number");

        // Valid requests go on to the middlewares, which drop them here
        let res = handler.handle(&mut Request::new().uri("/news?page=2"));
        assert!(matches!(res, Ok(None)));
    }

    #[test]
    fn validates_form_of_post_requests() {
        let view = View::builder("/login", |_: &mut Request| "welcome")
            .validate(Stage::Form, |params: &Query| {
                if params.get("user").is_some_and(|user| !user.is_empty()) {
                    Ok(())
                } else {
                    Err(String::from("user is required"))
                }
            })
            .build()
            .expect("valid view");

        let handler: &dyn RequestHandler = &view;
        let mut req = Request::new()
            .method(Method::Post)
            .uri("/login?user=steve")
            .body("user=");
        let res = handler.handle(&mut req).ok().flatten().expect("rejection");
        assert_eq!(res.status, Status::BadRequest);

        let mut req = Request::new()
            .method(Method::Post)
            .uri("/login")
            .body("user=steve");
        let res = handler.handle(&mut req).ok().flatten().expect("response");
        assert_eq!(body(res), "welcome");
    }

    #[test]
    fn handlers_without_middlewares_generate() {
        let handler: &dyn RequestHandler = &NotFound::new("/missing");
        let res = handler.handle(&mut Request::new().uri("/missing"));
        assert_eq!(
            res.ok().flatten().map(|res| res.status),
            Some(Status::NotFound)
        );
    }
}
