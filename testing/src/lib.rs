//! # Simple Provider Testing
//!
//! Testing utilities and helpers for Simple Provider.
//!
//! This crate provides:
//! - [`render`]: mount an element and inspect what it committed
//! - [`ReducerTest`]: Given-When-Then assertions for reducers
//! - [`mocks::CallCounter`]: count calls made from reducers and handlers
//! - [`init_test_tracing`]: log output captured by the test harness
//!
//! ## Example
//!
//! ```
//! use simple_provider_runtime::{Children, Element};
//! use simple_provider_testing::render;
//!
//! let result = render(Element::from_fn("Hello", |cx| {
//!     cx.text("Hello, world");
//!     Ok(Children::new())
//! }))?;
//!
//! assert!(result.get_by_text("world").is_some());
//! # Ok::<(), simple_provider_runtime::RenderError>(())
//! ```

use simple_provider_runtime::{Element, RenderError, Root, RootConfig};

mod reducer_test;

pub use reducer_test::ReducerTest;

/// Mock implementations for testing.
pub mod mocks {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Shared call counter
    ///
    /// Clones share the count, so one clone can live inside a reducer or a
    /// handler while the test keeps another.
    ///
    /// ```
    /// use simple_provider_testing::mocks::CallCounter;
    ///
    /// let counter = CallCounter::new();
    /// let inside = counter.clone();
    /// inside.record();
    /// assert_eq!(counter.count(), 1);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct CallCounter {
        calls: Arc<AtomicUsize>,
    }

    impl CallCounter {
        /// Counter starting at zero
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Record one call
        pub fn record(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        /// Calls recorded so far
        #[must_use]
        pub fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }
}

/// A mounted element under test
pub struct RenderResult {
    root: Root,
}

impl RenderResult {
    /// Full committed output
    #[must_use]
    pub fn text(&self) -> String {
        self.root.text()
    }

    /// First committed line containing `needle`
    #[must_use]
    pub fn get_by_text(&self, needle: &str) -> Option<&str> {
        self.root
            .output()
            .iter()
            .map(String::as_str)
            .find(|line| line.contains(needle))
    }

    /// Invoke the handler for `event` and flush the resulting updates
    ///
    /// # Errors
    ///
    /// See [`Root::fire`].
    pub fn fire_event(&mut self, event: &str) -> Result<usize, RenderError> {
        self.root.fire(event)
    }

    /// Apply updates dispatched from outside a handler
    ///
    /// # Errors
    ///
    /// See [`Root::flush`].
    pub fn flush(&mut self) -> Result<usize, RenderError> {
        self.root.flush()
    }

    /// The underlying root
    #[must_use]
    pub const fn root(&self) -> &Root {
        &self.root
    }

    /// The underlying root, mutably
    pub const fn root_mut(&mut self) -> &mut Root {
        &mut self.root
    }

    /// Give back the root
    #[must_use]
    pub fn into_root(self) -> Root {
        self.root
    }
}

/// Mount `element`, run its mount effects and flush what they dispatched
///
/// # Errors
///
/// Any [`RenderError`] raised while mounting.
pub fn render(element: Element) -> Result<RenderResult, RenderError> {
    render_with_config(element, RootConfig::default())
}

/// [`render`] with a custom root configuration
///
/// # Errors
///
/// Any [`RenderError`] raised while mounting.
pub fn render_with_config(
    element: Element,
    config: RootConfig,
) -> Result<RenderResult, RenderError> {
    let mut root = Root::with_config(element, config);
    root.render()?;
    root.flush()?;
    Ok(RenderResult { root })
}

/// Install a tracing subscriber writing through the test harness
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_provider_runtime=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocks::CallCounter;
    use simple_provider_runtime::Children;

    #[test]
    fn test_call_counter_is_shared() {
        let counter = CallCounter::new();
        let clone = counter.clone();
        clone.record();
        clone.record();
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_render_and_fire_event() {
        init_test_tracing();
        let clicks = CallCounter::new();
        let recorded = clicks.clone();

        let result = render(Element::from_fn("Button", move |cx| {
            let recorded = recorded.clone();
            cx.text("Press me");
            cx.on("click", move || recorded.record());
            Ok(Children::new())
        }));

        let Ok(mut result) = result else {
            unreachable!("render should succeed");
        };
        assert_eq!(result.get_by_text("Press"), Some("Press me"));
        assert!(result.get_by_text("missing").is_none());

        assert!(matches!(result.fire_event("click"), Ok(0)));
        assert_eq!(clicks.count(), 1);
    }
}
