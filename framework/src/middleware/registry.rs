//! The middleware stack wrapped around every matched route
//!
//! Bootstrap code registers process-wide middleware with
//! [`register_global_middleware`]; `Server::from_config` starts from those.

use super::{into_boxed, BoxedMiddleware, Middleware, MiddlewareChain};
use std::sync::{Mutex, OnceLock, PoisonError};

static REGISTERED: OnceLock<Mutex<Vec<BoxedMiddleware>>> = OnceLock::new();

fn registered() -> &'static Mutex<Vec<BoxedMiddleware>> {
    REGISTERED.get_or_init(|| Mutex::new(Vec::new()))
}

/// Run `middleware` on every request of servers built afterwards
///
/// ```rust,ignore
/// // bootstrap.rs
/// register_global_middleware(LoggingMiddleware);
/// ```
pub fn register_global_middleware<M: Middleware + 'static>(middleware: M) {
    registered()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(into_boxed(middleware));
}

/// Ordered middleware; the first pushed is the outermost
#[derive(Default, Clone)]
pub struct MiddlewareStack {
    layers: Vec<BoxedMiddleware>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything passed to [`register_global_middleware`] so far
    pub fn registered() -> Self {
        Self {
            layers: registered()
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub fn push<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.layers.push(into_boxed(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// A fresh chain for one request
    pub fn chain(&self) -> MiddlewareChain {
        let mut chain = MiddlewareChain::new();
        chain.extend(self.layers.iter().cloned());
        chain
    }
}
