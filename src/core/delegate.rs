//! Delegate builder trait: the "configuration sources in, resource out"
//! boundary.

use crate::error::Result;
use crate::sources::ConfigSource;
use std::sync::Arc;

/// Builds the expensive delegate resource from the current configuration
/// sources.
///
/// This is the collaborator boundary of the crate: parsing the sources and
/// constructing the resource is entirely the implementor's concern. The
/// factory only promises to call `build` again whenever a source's
/// modification timestamp changes, and to install the result atomically.
///
/// Implementations must be safe to call repeatedly and must not mutate
/// shared state visible outside the built delegate.
///
/// Closures with the right shape implement this trait, which keeps simple
/// builders (and tests) free of boilerplate:
///
/// ```rust
/// use hotswap_factory::prelude::*;
/// use std::sync::Arc;
///
/// let builder = |sources: &[Arc<dyn ConfigSource>]| -> Result<usize> {
///     Ok(sources.len())
/// };
/// ```
pub trait DelegateBuilder: Send + Sync {
    /// The resource this builder produces.
    type Delegate: Send + Sync + 'static;

    /// Build a fresh delegate from the given sources.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Build`](crate::error::FactoryError::Build)
    /// (or any other crate error) when the sources are malformed. A failed
    /// build never replaces the currently installed delegate.
    fn build(&self, sources: &[Arc<dyn ConfigSource>]) -> Result<Self::Delegate>;
}

impl<D, F> DelegateBuilder for F
where
    F: Fn(&[Arc<dyn ConfigSource>]) -> Result<D> + Send + Sync,
    D: Send + Sync + 'static,
{
    type Delegate = D;

    fn build(&self, sources: &[Arc<dyn ConfigSource>]) -> Result<D> {
        self(sources)
    }
}
