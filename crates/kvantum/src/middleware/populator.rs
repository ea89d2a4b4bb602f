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

//! Middleware queue populator.

use std::fmt;

use super::{Middleware, Queue};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Factory.
///
/// Factories are type-erased constructors of middlewares. As they're shared
/// by all threads dispatching to the same handler, they must be [`Send`] and
/// [`Sync`], whereas the middlewares they create live on a single thread.
pub trait Factory: Fn() -> Box<dyn Middleware> + Send + Sync {}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware queue populator.
///
/// Holds an ordered list of factories, and creates a new [`Queue`] with
/// fresh middleware instances for every request.
///
/// # Examples
///
/// ```
/// use kvantum::http::Request;
/// use kvantum::middleware::{Debug, Flow, Populator};
///
/// // Create populator and register middlewares
/// let mut populator = Populator::new();
/// populator.add::<Debug>();
/// populator.add_factory(|| |_: &mut Request| Flow::Continue);
///
/// // Generate queue
/// let queue = populator.generate_queue();
/// assert_eq!(queue.len(), 2);
/// ```
#[derive(Default)]
pub struct Populator {
    /// Middleware factories.
    factories: Vec<Box<dyn Factory>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Populator {
    /// Creates an empty populator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a middleware type, created with [`Default`] per request.
    pub fn add<M>(&mut self)
    where
        M: Middleware + Default,
    {
        self.factories.push(Box::new(|| {
            Box::new(M::default()) as Box<dyn Middleware>
        }));
    }

    /// Registers a function creating a middleware per request.
    pub fn add_factory<F, M>(&mut self, factory: F)
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Middleware,
    {
        self.factories.push(Box::new(move || {
            Box::new(factory()) as Box<dyn Middleware>
        }));
    }

    /// Creates a queue with a fresh instance of every registered middleware.
    #[must_use]
    pub fn generate_queue(&self) -> Queue {
        self.factories.iter().map(|factory| factory()).collect()
    }
}

#[allow(clippy::must_use_candidate)]
impl Populator {
    /// Returns the number of registered middlewares.
    #[inline]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns whether there are any registered middlewares.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Populator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Populator")
            .field("factories", &self.factories.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

#[rustfmt::skip]
impl<F> Factory for F
where
    F: Fn() -> Box<dyn Middleware> + Send + Sync {}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;
    use crate::middleware::Flow;

    #[derive(Default)]
    struct Once {
        calls: u32,
    }

    impl Middleware for Once {
        fn handle(&mut self, _req: &mut Request) -> Flow {
            self.calls += 1;
            if self.calls == 1 { Flow::Continue } else { Flow::Break }
        }
    }

    #[test]
    fn queues_hold_fresh_instances() {
        let mut populator = Populator::new();
        populator.add::<Once>();

        // State of one queue must not leak into the next
        for _ in 0..3 {
            let mut queue = populator.generate_queue();
            assert!(queue.handle(&mut Request::new()).is_ok());
            assert!(queue.finished());
        }
    }

    #[test]
    fn empty_populator_yields_empty_queue() {
        let populator = Populator::new();
        assert!(populator.is_empty());
        assert!(populator.generate_queue().is_empty());
    }
}
