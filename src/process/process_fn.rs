//! # Function-backed process (`ProcessFn`)
//!
//! [`ProcessFn`] wraps a closure `F: Fn() -> Fut` used as the process `tick`,
//! producing a fresh future per tick. Every other operation keeps its
//! default no-op body. If state must survive between ticks, capture an
//! `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use procvisor::{ProcessFn, ProcessRef, ProcessError};
//!
//! let frames = Arc::new(AtomicU32::new(0));
//! let counter: ProcessRef = {
//!     let frames = frames.clone();
//!     ProcessFn::arc("counter", move || {
//!         let frames = frames.clone();
//!         async move { Ok::<_, ProcessError>(frames.fetch_add(1, Ordering::SeqCst) < 9) }
//!     })
//! };
//!
//! assert_eq!(counter.name(), "counter");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::process::capability::Process;

/// Function-backed process implementation.
#[derive(Debug)]
pub struct ProcessFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProcessFn<F> {
    /// Creates a new function-backed process.
    ///
    /// Prefer [`ProcessFn::arc`] when you immediately need a [`ProcessRef`](crate::ProcessRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the process and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Process for ProcessFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, ProcessError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn tick(&self) -> Result<bool, ProcessError> {
        (self.f)().await
    }
}
