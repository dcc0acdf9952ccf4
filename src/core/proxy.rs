//! Stable forwarding proxy with a lifetime independent of any delegate.

use crate::core::{DelegateBuilder, HotswapFactory};
use std::sync::Arc;

/// A stable, stateless handle that forwards every call to whatever delegate
/// the factory currently holds.
///
/// Store one proxy for the life of the application; it stays valid across
/// arbitrarily many rebuilds. Each invocation snapshots the current
/// delegate first, so a call that begins against delegate `D` completes
/// against `D` even if a rebuild installs `D'` mid-call. Errors raised by
/// the delegate itself pass through verbatim; the proxy adds no
/// translation.
///
/// To expose a domain trait instead of the generic accessors, wrap the
/// proxy in a newtype and delegate each method through
/// [`with`](Self::with):
///
/// ```rust
/// use hotswap_factory::prelude::*;
/// use std::collections::HashMap;
///
/// struct MapperRegistry {
///     statements: HashMap<String, String>,
/// }
///
/// trait StatementLookup {
///     fn statement(&self, id: &str) -> Option<String>;
/// }
///
/// struct SharedRegistry<B: DelegateBuilder<Delegate = MapperRegistry>>(FactoryProxy<B>);
///
/// impl<B: DelegateBuilder<Delegate = MapperRegistry>> StatementLookup for SharedRegistry<B> {
///     fn statement(&self, id: &str) -> Option<String> {
///         self.0.with(|registry| registry.statements.get(id).cloned())
///     }
/// }
/// ```
pub struct FactoryProxy<B: DelegateBuilder> {
    factory: HotswapFactory<B>,
}

impl<B: DelegateBuilder> FactoryProxy<B> {
    pub(crate) fn new(factory: HotswapFactory<B>) -> Self {
        Self { factory }
    }

    /// Snapshot the delegate current at this instant.
    ///
    /// Hold the returned `Arc` for the duration of one logical call and
    /// then drop it; holding it longer pins the old delegate in memory
    /// across rebuilds.
    pub fn current(&self) -> Arc<B::Delegate> {
        self.factory.current()
    }

    /// Forward one call to the current delegate.
    ///
    /// Snapshots the delegate, runs `call` against it, and returns the
    /// result unchanged — including any error value the delegate produces.
    pub fn with<R>(&self, call: impl FnOnce(&B::Delegate) -> R) -> R {
        let delegate = self.factory.current();
        call(&delegate)
    }
}

impl<B: DelegateBuilder> Clone for FactoryProxy<B> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FactoryError, Result};
    use crate::sources::ConfigSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_factory() -> HotswapFactory<impl DelegateBuilder<Delegate = usize>> {
        let counter = AtomicUsize::new(1);
        let builder = move |_: &[Arc<dyn ConfigSource>]| -> Result<usize> {
            Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
        };
        HotswapFactory::from_parts(1, builder, Vec::new())
    }

    #[test]
    fn proxy_tracks_the_current_delegate() {
        let factory = counting_factory();
        let proxy = factory.proxy();

        assert_eq!(*proxy.current(), 1);
        factory.refresh().unwrap();
        assert_eq!(*proxy.current(), 2);
    }

    #[test]
    fn proxy_outlives_the_original_handle() {
        let factory = counting_factory();
        let proxy = factory.proxy();
        let refresher = factory.clone();
        drop(factory);

        refresher.refresh().unwrap();
        assert_eq!(*proxy.current(), 2);
    }

    #[test]
    fn call_pins_the_dispatched_delegate() {
        let factory = counting_factory();
        let proxy = factory.proxy();

        // A call that began against the old delegate completes against it,
        // even though a rebuild lands mid-call.
        let seen = proxy.with(|delegate| {
            factory.refresh().unwrap();
            *delegate
        });
        assert_eq!(seen, 1);
        assert_eq!(*proxy.current(), 2);
    }

    #[test]
    fn delegate_errors_pass_through_verbatim() {
        let factory = HotswapFactory::from_parts(
            "not a number".to_string(),
            |_: &[Arc<dyn ConfigSource>]| -> Result<String> { Ok(String::new()) },
            Vec::new(),
        );
        let proxy = factory.proxy();

        let forwarded: std::result::Result<i64, _> =
            proxy.with(|delegate| delegate.parse::<i64>());
        assert!(forwarded.is_err());
    }

    #[test]
    fn cloned_proxies_share_the_factory() {
        let factory = counting_factory();
        let proxy = factory.proxy();
        let clone = proxy.clone();

        factory.refresh().unwrap();
        assert_eq!(*proxy.current(), *clone.current());
    }

    #[test]
    fn build_failures_never_reach_proxy_callers() {
        let failing = |_: &[Arc<dyn ConfigSource>]| -> Result<usize> {
            Err(FactoryError::build("boom"))
        };
        let factory = HotswapFactory::from_parts(7, failing, Vec::new());
        let proxy = factory.proxy();

        assert!(factory.refresh().is_err());
        // The proxy still serves the previous delegate; no error surfaces.
        assert_eq!(*proxy.current(), 7);
    }
}
