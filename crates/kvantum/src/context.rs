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

//! Application context.
//!
//! The context owns everything that's shared across requests: configuration,
//! the router and the file system. It's created once at startup, and passed
//! to whatever accepts connections, which then calls [`Context::dispatch`]
//! for every parsed request.

use std::sync::Arc;
use tracing::{debug, error};

use super::config::Config;
use super::fs::{FileSystem, LocalFileSystem};
use super::handler::outcome::{Delegate, DEBUG};
use super::handler::view::Builder;
use super::handler::{HttpsRedirect, RequestHandler, Resolver, StaticFiles, View};
use super::http::{Body, Method, Protocol, Request, Response, ResponseExt, Status};
use super::middleware::Debug;
use super::pattern::{FilePattern, TryIntoPattern};
use super::router::Router;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Maximum number of internal redirects per request.
const MAX_REDIRECTS: usize = 8;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// Configuration.
    config: Config,
    /// Router.
    router: Router,
    /// File system.
    fs: Arc<dyn FileSystem>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Context {
    /// Creates a context.
    ///
    /// Files are served from the configured root directory.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let fs = LocalFileSystem::new(config.files.root.clone());
        Self {
            config,
            router: Router::new(),
            fs: Arc::new(fs),
        }
    }

    /// Replaces the file system.
    #[must_use]
    pub fn with_file_system<F>(mut self, fs: F) -> Self
    where
        F: FileSystem,
    {
        self.fs = Arc::new(fs);
        self
    }

    /// Creates a view builder.
    ///
    /// With debugging enabled, the view receives the [`Debug`] middleware
    /// and the matching alternate outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::config::Config;
    /// use kvantum::context::Context;
    /// use kvantum::handler::RequestHandler;
    /// use kvantum::http::Request;
    ///
    /// // Create context with debugging enabled
    /// let context = Context::new(Config { debug: true, ..Config::default() });
    /// let view = context.view("/status", |_: &mut Request| "ok").build()?;
    /// assert!(view.outcomes().is_some_and(|outcomes| outcomes.contains("debug")));
    /// # Ok(())
    /// # }
    /// ```
    pub fn view<P, R>(&self, pattern: P, resolver: R) -> Builder<R>
    where
        P: TryIntoPattern,
        R: Resolver,
    {
        let builder = View::builder(pattern, resolver);
        if self.config.debug {
            builder.with::<Debug>().outcome(DEBUG, Delegate)
        } else {
            builder
        }
    }

    /// Creates a static file resolver reading from the context's file system.
    #[must_use]
    pub fn static_files(&self) -> StaticFiles {
        StaticFiles::new(Arc::clone(&self.fs)).buffer(self.config.files.buffer)
    }

    /// Creates a view builder serving static files for the given file pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kvantum::config::Config;
    /// use kvantum::context::Context;
    ///
    /// // Create context and serve files
    /// let context = Context::new(Config::default());
    /// let view = context.files("/assets/{folder}/{file}.{extension}").build()?;
    /// context.router().add(view)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn files(&self, pattern: &str) -> Builder<StaticFiles> {
        self.view(FilePattern::new(pattern), self.static_files())
    }

    /// Dispatches a request, returning the response to send.
    ///
    /// The request is resolved to a handler, which is replaced with an HTTPS
    /// redirect if it requires HTTPS and the request came in over HTTP. If
    /// the handler's middlewares drop the request, no response is returned,
    /// unless an internal redirect was requested, in which case the request
    /// is dispatched again for the new path. Handler errors are logged and
    /// answered with "500 Internal Server Error".
    #[tracing::instrument(
        skip_all,
        fields(method = %req.method, path = %req.uri.path)
    )]
    pub fn dispatch(&self, mut req: Request) -> Option<Response> {
        for _ in 0..=MAX_REDIRECTS {
            let mut handler: Arc<dyn RequestHandler> =
                self.router.resolve(&mut req);
            if handler.force_https() && req.protocol == Protocol::Http {
                handler = Arc::new(HttpsRedirect::from_config(&self.config));
            }

            // Handle request and follow internal redirects
            match handler.handle(&mut req) {
                Ok(Some(res)) => return Some(finish(&req, res)),
                Ok(None) => {
                    let target = req.take_internal_redirect()?;
                    debug!(target = target.as_str(), "internal redirect");
                    req = req.into_redirect(&target);
                }
                Err(err) => {
                    error!(
                        handler = handler.name(),
                        id = %handler.id(),
                        %err,
                        "handling failed"
                    );
                    return Some(Response::from_status(
                        Status::InternalServerError,
                    ));
                }
            }
        }

        // Redirect limit exceeded
        error!(limit = MAX_REDIRECTS, "too many internal redirects");
        Some(Response::from_status(Status::InternalServerError))
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the router.
    #[inline]
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the file system.
    #[inline]
    #[must_use]
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Finishes the response, dropping the body for `HEAD` requests.
fn finish(req: &Request, mut res: Response) -> Response {
    if req.method == Method::Head {
        res.body = Body::default();
    }
    res
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::fs::tests::Memory;
    use crate::handler::{self, Stage};
    use crate::http::{Header, Query};
    use crate::middleware::Flow;

    fn init() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    fn text(res: Response) -> String {
        let bytes = res.body.into_bytes().expect("body");
        String::from_utf8(bytes).expect("utf-8")
    }

    /// Resolver counting generated responses.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Resolver for Counting {
        fn generate(&self, _req: &mut Request) -> handler::Result<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::from_text("counted"))
        }
    }

    /// Resolver failing to generate.
    struct Failing;

    impl Resolver for Failing {
        fn generate(&self, _req: &mut Request) -> handler::Result<Response> {
            Err(handler::Error::Generate(String::from("database down")))
        }
    }

    #[test]
    fn dispatches_to_matching_view() {
        init();
        let context = Context::new(Config::default());
        context
            .router()
            .get("/plot/{world}/{id}", |req: &mut Request| {
                let world = req.variable("world").unwrap_or_default();
                let id = req.variable("id").unwrap_or_default();
                format!("{world}:{id}")
            })
            .expect("view");

        let res = context
            .dispatch(Request::new().uri("/plot/survival/12"))
            .expect("response");
        assert_eq!(res.status, Status::Ok);
        assert_eq!(text(res), "survival:12");

        let res = context
            .dispatch(Request::new().uri("/plot/survival"))
            .expect("response");
        assert_eq!(res.status, Status::NotFound);
    }

    #[test]
    fn debug_mode_routes_through_debug_outcome() {
        init();
        let context = Context::new(Config { debug: true, ..Config::default() });
        let view = context
            .view("/status", Counting::default())
            .build()
            .expect("view");
        let view = context.router().add(view).expect("registered");

        let res = context
            .dispatch(Request::new().uri("/status"))
            .expect("response");
        assert_eq!(text(res), "counted");
        assert_eq!(view.resolver().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropped_requests_yield_nothing() {
        init();
        let context = Context::new(Config::default());
        let view = View::builder("/admin", Counting::default())
            .middleware(|| |_: &mut Request| Flow::Break)
            .build()
            .expect("view");
        let view = context.router().add(view).expect("registered");

        assert!(context.dispatch(Request::new().uri("/admin")).is_none());
        assert_eq!(view.resolver().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn follows_internal_redirects() {
        init();
        let context = Context::new(Config::default());
        let old = View::builder("/old", |_: &mut Request| "old")
            .middleware(|| {
                |req: &mut Request| {
                    req.internal_redirect("/new");
                    Flow::Break
                }
            })
            .build()
            .expect("old");
        context.router().add(old).expect("registered");
        context.router().get("/new", |_: &mut Request| "new").expect("new");

        let res = context
            .dispatch(Request::new().uri("/old"))
            .expect("response");
        assert_eq!(text(res), "new");
    }

    #[test]
    fn redirect_loops_are_cut() {
        init();
        let context = Context::new(Config::default());
        let view = View::builder("/loop", |_: &mut Request| "loop")
            .middleware(|| {
                |req: &mut Request| {
                    req.internal_redirect("/loop");
                    Flow::Break
                }
            })
            .build()
            .expect("view");
        context.router().add(view).expect("registered");

        let res = context
            .dispatch(Request::new().uri("/loop"))
            .expect("response");
        assert_eq!(res.status, Status::InternalServerError);
    }

    #[test]
    fn errors_become_internal_server_errors() {
        init();
        let context = Context::new(Config::default());
        context.router().get("/fail", Failing).expect("fail");
        let view = View::builder("/outcome", |_: &mut Request| "ok")
            .middleware(|| {
                |req: &mut Request| {
                    req.use_alternate_outcome("missing");
                    Flow::Continue
                }
            })
            .build()
            .expect("view");
        context.router().add(view).expect("registered");

        for path in ["/fail", "/outcome"] {
            let res = context
                .dispatch(Request::new().uri(path))
                .expect("response");
            assert_eq!(res.status, Status::InternalServerError, "{path}");
        }
    }

    #[test]
    fn forces_https() {
        init();
        let config = Config {
            web_address: String::from("example.com"),
            ..Config::default()
        };
        let context = Context::new(config);
        let view = context
            .view("/account", |_: &mut Request| "account")
            .force_https(true)
            .build()
            .expect("view");
        context.router().add(view).expect("registered");

        let res = context
            .dispatch(Request::new().uri("/account?tab=2"))
            .expect("response");
        assert_eq!(res.status, Status::Found);
        assert_eq!(
            res.headers.get(Header::Location),
            Some("https://example.com/account/?tab=2")
        );

        let req = Request::new().uri("/account").protocol(Protocol::Https);
        let res = context.dispatch(req).expect("response");
        assert_eq!(text(res), "account");
    }

    #[test]
    fn validates_before_dispatching_with_defaults() {
        init();
        let context = Context::new(Config::default());
        let view = context
            .view("/news/{page=1}", |req: &mut Request| {
                format!("page {}", req.variable("page").unwrap_or_default())
            })
            .validate(Stage::Query, |params: &Query| {
                match params.get("sort") {
                    None | Some("date" | "title") => Ok(()),
                    Some(sort) => Err(format!("cannot sort by {sort}")),
                }
            })
            .build()
            .expect("view");
        context.router().add(view).expect("registered");

        let res = context.dispatch(Request::new().uri("/news")).expect("response");
        assert_eq!(text(res), "page 1");

        let req = Request::new().uri("/news/3?sort=title");
        let res = context.dispatch(req).expect("response");
        assert_eq!(text(res), "page 3");

        let req = Request::new().uri("/news/3?sort=size");
        let res = context.dispatch(req).expect("response");
        assert_eq!(res.status, Status::BadRequest);
        assert_eq!(text(res), "cannot sort by size");
    }

    #[test]
    fn head_responses_have_no_body() {
        init();
        let context = Context::new(Config::default());
        context.router().head("/ping", |_: &mut Request| "pong").expect("head");

        let req = Request::new().method(Method::Head).uri("/ping");
        let res = context.dispatch(req).expect("response");
        assert!(res.body.is_empty());
        assert_eq!(res.headers.get(Header::ContentLength), Some("4"));
    }

    #[test]
    fn serves_files_from_file_system() {
        init();
        let fs = Memory::default().file("css/main.css", "body {}");
        let context = Context::new(Config::default()).with_file_system(fs);
        let view = context
            .files("/assets/{folder}/{file}.{extension}")
            .build()
            .expect("view");
        context.router().add(view).expect("registered");

        let res = context
            .dispatch(Request::new().uri("/assets/css/main.css"))
            .expect("response");
        assert_eq!(res.headers.get(Header::ContentType), Some("text/css"));
        assert_eq!(text(res), "body {}");
    }
}
