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

//! Middleware queue.

use tracing::debug;

use crate::handler::{Error, Result};
use crate::http::Request;

use super::{Flow, Middleware};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Queue state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Not yet run.
    Pending,
    /// All middlewares continued.
    Finished,
    /// A middleware stopped the chain.
    Broken,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware queue.
///
/// A queue is created for a single request and can only be run once. It's
/// finished if every middleware continued, which includes the empty queue.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::http::Request;
/// use kvantum::middleware::{Flow, Middleware, Queue};
///
/// // Create queue with a middleware that stops the chain
/// let mut queue = Queue::from_iter([
///     Box::new(|_: &mut Request| Flow::Break) as Box<dyn Middleware>,
/// ]);
///
/// // Run queue
/// queue.handle(&mut Request::new())?;
/// assert!(!queue.finished());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Queue {
    /// Middlewares in order.
    middlewares: Vec<Box<dyn Middleware>>,
    /// Queue state.
    state: State,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Queue {
    /// Runs the middlewares in order until one of them stops the chain.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Consumed`], if the queue was already run.
    pub fn handle(&mut self, req: &mut Request) -> Result {
        if self.state != State::Pending {
            return Err(Error::Consumed);
        }

        // Stop at the first middleware that breaks the chain
        for (index, middleware) in self.middlewares.iter_mut().enumerate() {
            if middleware.handle(req) == Flow::Break {
                debug!(index, path = %req.uri.path, "middleware broke the chain");
                self.state = State::Broken;
                return Ok(());
            }
        }

        // All middlewares continued
        self.state = State::Finished;
        Ok(())
    }

    /// Returns whether all middlewares continued.
    #[inline]
    #[must_use]
    pub fn finished(&self) -> bool {
        self.state == State::Finished
    }
}

#[allow(clippy::must_use_candidate)]
impl Queue {
    /// Returns the number of middlewares.
    #[inline]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns whether there are any middlewares.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl FromIterator<Box<dyn Middleware>> for Queue {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Box<dyn Middleware>>,
    {
        Self {
            middlewares: Vec::from_iter(iter),
            state: State::Pending,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counting(calls: &Arc<AtomicUsize>, flow: Flow) -> Box<dyn Middleware> {
        let calls = Arc::clone(calls);
        Box::new(move |_: &mut Request| {
            calls.fetch_add(1, Ordering::SeqCst);
            flow
        })
    }

    #[test]
    fn empty_queue_finishes() {
        let mut queue = Queue::from_iter([]);
        assert!(queue.handle(&mut Request::new()).is_ok());
        assert!(queue.finished());
    }

    #[test]
    fn break_skips_remaining_middlewares() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut queue = Queue::from_iter([
            counting(&calls, Flow::Continue),
            counting(&calls, Flow::Break),
            counting(&calls, Flow::Continue),
        ]);

        assert!(queue.handle(&mut Request::new()).is_ok());
        assert!(!queue.finished());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn middlewares_see_earlier_mutations() {
        let mut queue = Queue::from_iter([
            Box::new(|req: &mut Request| {
                req.meta.insert("seen", 1_u32);
                Flow::Continue
            }) as Box<dyn Middleware>,
            Box::new(|req: &mut Request| {
                if req.meta.contains("seen") {
                    Flow::Continue
                } else {
                    Flow::Break
                }
            }),
        ]);

        assert!(queue.handle(&mut Request::new()).is_ok());
        assert!(queue.finished());
    }

    #[test]
    fn queue_runs_once() {
        let mut queue = Queue::from_iter([]);
        let mut req = Request::new();
        assert!(queue.handle(&mut req).is_ok());
        assert!(matches!(queue.handle(&mut req), Err(Error::Consumed)));
    }
}
