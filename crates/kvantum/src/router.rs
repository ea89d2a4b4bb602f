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

//! Router.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, trace, warn};

use super::handler::{NotFound, RequestHandler, Resolver, View};
use super::http::{Method, Request};
use super::pattern::TryIntoPattern;

mod error;

pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Fallback handler factory.
///
/// Invoked with the request when no registered handler matches, which means
/// resolution always yields a handler.
pub trait Fallback:
    Fn(&Request) -> Arc<dyn RequestHandler> + Send + Sync + 'static
{
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Router.
///
/// Handlers are kept in registration order, and the first one that matches a
/// request wins. Registration and removal may happen while other threads are
/// resolving requests. Every change swaps in a new list, so resolution works
/// on a consistent snapshot and never holds the lock while matching.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::handler::RequestHandler;
/// use kvantum::http::Request;
/// use kvantum::router::Router;
///
/// // Create router and add routes
/// let router = Router::new();
/// router.get("/plot/{world}/{id}", |_: &mut Request| "plot")?;
/// router.any("/plot/{world}", |_: &mut Request| "world")?;
///
/// // Resolve request
/// let mut req = Request::new().uri("/plot/survival");
/// let handler = router.resolve(&mut req);
/// assert_eq!(handler.filter(), "/plot/{world}");
/// assert_eq!(req.variable("world"), Some("survival"));
/// # Ok(())
/// # }
/// ```
pub struct Router {
    /// Registered handlers.
    handlers: RwLock<Arc<[Arc<dyn RequestHandler>]>>,
    /// Fallback handler factory.
    fallback: Box<dyn Fallback>,
}

/// Registered handler, as listed by [`Router::dump`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Type name.
    pub kind: &'static str,
    /// Name.
    pub name: String,
    /// Filter.
    pub filter: String,
    /// Accepted method, or `None` for any method.
    pub method: Option<Method>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Router {
    /// Creates a router that falls back to [`NotFound`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Arc::from(Vec::new())),
            fallback: Box::new(not_found),
        }
    }

    /// Replaces the fallback handler factory.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use kvantum::handler::{RequestHandler, View};
    /// use kvantum::http::Request;
    /// use kvantum::router::Router;
    ///
    /// // Create router with custom fallback
    /// let fallback: Arc<dyn RequestHandler> = Arc::new(
    ///     View::builder("/{path}", |_: &mut Request| "gone")
    ///         .name("gone")
    ///         .build()
    ///         .unwrap(),
    /// );
    /// let router = Router::new()
    ///     .with_fallback(move |_: &Request| Arc::clone(&fallback));
    ///
    /// // Resolve request
    /// let handler = router.resolve(&mut Request::new().uri("/old"));
    /// assert_eq!(handler.name(), "gone");
    /// ```
    #[must_use]
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fallback,
    {
        self.fallback = Box::new(fallback);
        self
    }

    /// Registers a handler, returning it.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Duplicate`], if a handler with the same
    /// filter is already registered.
    pub fn add<H>(&self, handler: H) -> Result<Arc<H>>
    where
        H: RequestHandler,
    {
        let handler = Arc::new(handler);
        self.insert(handler.clone())?;
        Ok(handler)
    }

    /// Registers a shared handler.
    ///
    /// Filters are compared ignoring case. A filter can only be registered
    /// once, regardless of the method the handler is restricted to.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Duplicate`], if a handler with the same
    /// filter is already registered. The router is left as is.
    pub fn insert(&self, handler: Arc<dyn RequestHandler>) -> Result {
        let mut handlers = self.write();
        let duplicate = handlers
            .iter()
            .any(|other| other.filter().eq_ignore_ascii_case(handler.filter()));
        if duplicate {
            warn!(filter = handler.filter(), "duplicate route");
            return Err(Error::Duplicate(handler.filter().to_string()));
        }

        // Swap in extended list
        let mut next = handlers.to_vec();
        next.push(Arc::clone(&handler));
        *handlers = Arc::from(next);
        info!(
            handler = handler.name(),
            filter = handler.filter(),
            id = %handler.id(),
            "registered handler"
        );
        Ok(())
    }

    /// Registers all given handlers in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Duplicate`], if a handler with the same
    /// filter is already registered. Handlers before it stay
    /// registered.
    pub fn add_all<I>(&self, handlers: I) -> Result
    where
        I: IntoIterator<Item = Arc<dyn RequestHandler>>,
    {
        handlers.into_iter().try_for_each(|handler| self.insert(handler))
    }

    /// Resolves the handler for the given request.
    ///
    /// Handlers are asked in registration order, and the first one whose
    /// [`RequestHandler::matches`] returns `true` is returned. Errors while
    /// matching are logged and count as a mismatch. If no handler matches,
    /// the fallback handler is returned.
    pub fn resolve(&self, req: &mut Request) -> Arc<dyn RequestHandler> {
        let handlers = self.all();
        for handler in handlers.iter() {
            match handler.matches(req) {
                Ok(true) => {
                    let path = req.uri.path.as_str();
                    trace!(handler = handler.name(), path, "matched");
                    return Arc::clone(handler);
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(handler = handler.name(), %err, "matching failed");
                }
            }
        }

        // No handler matched
        trace!(path = req.uri.path.as_str(), "using fallback");
        (self.fallback)(&*req)
    }

    /// Removes the given handler, returning whether it was registered.
    ///
    /// Handlers are compared by identifier.
    pub fn remove(&self, handler: &dyn RequestHandler) -> bool {
        let mut handlers = self.write();
        let id = handler.id();
        if !handlers.iter().any(|other| other.id() == id) {
            return false;
        }

        // Swap in reduced list
        let next = handlers
            .iter()
            .filter(|other| other.id() != id)
            .cloned()
            .collect::<Vec<_>>();
        *handlers = Arc::from(next);
        info!(handler = handler.name(), %id, "removed handler");
        true
    }

    /// Removes all handlers, returning how many were registered.
    pub fn clear(&self) -> usize {
        let mut handlers = self.write();
        let count = handlers.len();
        *handlers = Arc::from(Vec::new());
        info!(count, "cleared handlers");
        count
    }

    /// Lists and logs all registered handlers.
    pub fn dump(&self) -> Vec<Entry> {
        let handlers = self.all();
        handlers
            .iter()
            .map(|handler| {
                debug!(
                    kind = handler.kind(),
                    name = handler.name(),
                    filter = handler.filter(),
                    method = ?handler.method(),
                    "registered"
                );
                Entry {
                    kind: handler.kind(),
                    name: handler.name().to_string(),
                    filter: handler.filter().to_string(),
                    method: handler.method(),
                }
            })
            .collect()
    }

    /// Returns a snapshot of the registered handlers.
    #[must_use]
    pub fn all(&self) -> Arc<[Arc<dyn RequestHandler>]> {
        Arc::clone(&self.read())
    }

    /// Obtains read access, recovering from poisoning.
    fn read(&self) -> RwLockReadGuard<'_, Arc<[Arc<dyn RequestHandler>]>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Obtains write access, recovering from poisoning.
    fn write(&self) -> RwLockWriteGuard<'_, Arc<[Arc<dyn RequestHandler>]>> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Router {
    /// Registers a `GET` view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn get<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(Some(Method::Get), pattern, resolver)
    }

    /// Registers a `POST` view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn post<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(Some(Method::Post), pattern, resolver)
    }

    /// Registers a `PUT` view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn put<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(Some(Method::Put), pattern, resolver)
    }

    /// Registers a `PATCH` view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn patch<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(Some(Method::Patch), pattern, resolver)
    }

    /// Registers a `DELETE` view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn delete<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(Some(Method::Delete), pattern, resolver)
    }

    /// Registers a `HEAD` view.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn head<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(Some(Method::Head), pattern, resolver)
    }

    /// Registers a view accepting any method.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the pattern is malformed,
    /// and [`Error::Duplicate`], if the route is already registered.
    #[inline]
    pub fn any<P, R>(&self, pattern: P, resolver: R) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        self.route(None, pattern, resolver)
    }

    /// Builds and registers a view.
    fn route<P, R>(
        &self, method: Option<Method>, pattern: P, resolver: R,
    ) -> Result<Arc<View<R>>>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        let mut builder = View::builder(pattern, resolver);
        if let Some(method) = method {
            builder = builder.method(method);
        }
        self.add(builder.build()?)
    }
}

#[allow(clippy::must_use_candidate)]
impl Router {
    /// Returns the number of registered handlers.
    #[inline]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns whether no handlers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Router {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.all())
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F> Fallback for F where
    F: Fn(&Request) -> Arc<dyn RequestHandler> + Send + Sync + 'static
{
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Creates a [`NotFound`] handler bound to the path of the request.
fn not_found(req: &Request) -> Arc<dyn RequestHandler> {
    Arc::new(NotFound::new(req.uri.path.as_str()))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::handler;
    use crate::http::{Response, ResponseExt};

    /// Resolver counting how often it was asked.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Resolver for Counting {
        fn passes(&self, _req: &mut Request) -> handler::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        fn generate(&self, _req: &mut Request) -> handler::Result<Response> {
            Ok(Response::from_text("counted"))
        }
    }

    /// Resolver failing to check.
    struct Failing;

    impl Resolver for Failing {
        fn passes(&self, _req: &mut Request) -> handler::Result<bool> {
            Err(handler::Error::Generate(String::from("unavailable")))
        }

        fn generate(&self, _req: &mut Request) -> handler::Result<Response> {
            Ok(Response::from_text("failing"))
        }
    }

    #[test]
    fn first_match_wins() {
        let router = Router::new();
        let a = router.any("/a/{x}", Counting::default()).expect("a");
        let b = router.any("/a/{y}", Counting::default()).expect("b");

        let mut req = Request::new().uri("/a/5");
        let handler = router.resolve(&mut req);
        assert_eq!(handler.id(), a.id());
        assert_eq!(req.variable("x"), Some("5"));
        assert_eq!(req.variable("y"), None);
        assert_eq!(b.resolver().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_is_rejected() {
        let router = Router::new();
        router.any("/a/{x}", |_: &mut Request| "a").expect("a");
        router.any("/a/{y}", |_: &mut Request| "b").expect("b");

        for filter in ["/a/{x}", "/A/{X}"] {
            let res = router.any(filter, |_: &mut Request| "c");
            assert!(matches!(res, Err(Error::Duplicate(_))), "{filter}");
            assert_eq!(router.len(), 2);
        }
    }

    #[test]
    fn filter_is_unique_across_methods() {
        let router = Router::new();
        router.get("/form", |_: &mut Request| "show").expect("get");

        let res = router.post("/form", |_: &mut Request| "submit");
        assert!(matches!(res, Err(Error::Duplicate(filter)) if filter == "/form"));
        let res = router.any("/FORM", |_: &mut Request| "any");
        assert!(matches!(res, Err(Error::Duplicate(_))));
        assert_eq!(router.len(), 1);

        let entries = router.dump();
        assert_eq!(entries[0].method, Some(Method::Get));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let router = Router::new();
        let res = router.get("/a/{b", |_: &mut Request| "a");
        assert!(matches!(res, Err(Error::Handler(handler::Error::Pattern(_)))));
        assert!(router.is_empty());
    }

    #[test]
    fn falls_back_to_not_found() {
        let router = Router::new();
        router.get("/a", |_: &mut Request| "a").expect("a");

        let mut req = Request::new().uri("/b");
        let handler = router.resolve(&mut req);
        assert_eq!(handler.name(), "404");
        assert_eq!(handler.filter(), "/b");
    }

    #[test]
    fn matching_errors_count_as_mismatch() {
        let router = Router::new();
        router.any("/a", Failing).expect("failing");
        router.any("/{x}", |_: &mut Request| "x").expect("x");

        let handler = router.resolve(&mut Request::new().uri("/a"));
        assert_eq!(handler.filter(), "/{x}");
    }

    #[test]
    fn remove_and_clear() {
        let router = Router::new();
        let a = router.any("/a", |_: &mut Request| "a").expect("a");
        router.any("/b", |_: &mut Request| "b").expect("b");
        router.any("/c", |_: &mut Request| "c").expect("c");

        assert!(router.remove(&*a));
        assert!(!router.remove(&*a));
        assert_eq!(router.len(), 2);

        // Removed filter may be registered again
        router.any("/a", |_: &mut Request| "a").expect("a");
        let filters = router
            .dump()
            .into_iter()
            .map(|entry| entry.filter)
            .collect::<Vec<_>>();
        assert_eq!(filters, ["/b", "/c", "/a"]);

        assert_eq!(router.clear(), 3);
        assert!(router.is_empty());
        assert_eq!(router.clear(), 0);
    }

    #[test]
    fn add_all_stops_at_duplicate() {
        let router = Router::new();
        let handlers: Vec<Arc<dyn RequestHandler>> = vec![
            Arc::new(NotFound::new("/a")),
            Arc::new(NotFound::new("/b")),
            Arc::new(NotFound::new("/a")),
            Arc::new(NotFound::new("/c")),
        ];
        assert!(router.add_all(handlers).is_err());
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn concurrent_registration_and_resolution() {
        let router = Router::new();
        router.any("/static/{file}", |_: &mut Request| "file").expect("file");

        thread::scope(|scope| {
            scope.spawn(|| {
                for index in 0..64 {
                    let filter = format!("/page/{index}");
                    router.get(filter.as_str(), |_: &mut Request| "page").expect("page");
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..256 {
                        let mut req = Request::new().uri("/static/app.js");
                        let handler = router.resolve(&mut req);
                        assert_eq!(handler.filter(), "/static/{file}");
                    }
                });
            }
        });
        assert_eq!(router.len(), 65);
    }
}
