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

//! Request routing, dispatch and middleware core.
//!
//! This crate implements the part of an embedded application server that sits
//! between the transport and the application: filter patterns with `{name}`
//! placeholders are compiled into matchers, handlers are registered with a
//! [`Router`][] in priority order, and every matched request runs through a
//! freshly populated middleware queue before a response is generated.
//!
//! Parsing HTTP from the wire, TLS and templating are left to collaborators,
//! which hand the core a [`Request`][] and receive an optional [`Response`][].
//!
//! [`Request`]: crate::http::Request
//! [`Response`]: crate::http::Response
//! [`Router`]: crate::router::Router
//!
//! # Examples
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use kvantum::config::Config;
//! use kvantum::context::Context;
//! use kvantum::http::{Method, Request, Response, ResponseExt, Status};
//!
//! // Create context and register a view
//! let context = Context::new(Config::default());
//! context.router().get("/plot/{world}/{id}", |req: &mut Request| {
//!     let id = req.variable("id").unwrap_or_default().to_string();
//!     Response::from_text(id)
//! })?;
//!
//! // Dispatch request
//! let req = Request::new()
//!     .method(Method::Get)
//!     .uri("/plot/survival/12");
//!
//! let res = context.dispatch(req).expect("response");
//! assert_eq!(res.status, Status::Ok);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod context;
pub mod fs;
pub mod handler;
pub mod http;
pub mod middleware;
pub mod pattern;
pub mod router;
