//! Configuration source trait.

use crate::error::Result;
use std::time::SystemTime;

/// Trait for configuration sources that feed a delegate builder.
///
/// A source is an identity plus two read capabilities: its current
/// modification timestamp (driving change detection) and its content
/// (consumed by the [`DelegateBuilder`](crate::core::DelegateBuilder)).
/// Implement this trait to watch sources other than local files (e.g.
/// object stores, databases, key-value stores).
///
/// Sources are never mutated in place; the whole set may be replaced
/// wholesale via
/// [`HotswapFactory::set_sources`](crate::core::HotswapFactory::set_sources).
pub trait ConfigSource: Send + Sync {
    /// Opaque key identifying this source.
    ///
    /// Used to key the change tracker's last-observed timestamps and as the
    /// label in log output, so it should be stable and human-readable
    /// (e.g. `"file:mappers/user.toml"`).
    fn identity(&self) -> String;

    /// Read the source's current modification timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::SourceRead`](crate::error::FactoryError::SourceRead)
    /// if the timestamp cannot be read. The change tracker logs the failure
    /// and treats the source as unchanged for that tick.
    fn last_modified(&self) -> Result<SystemTime>;

    /// Read the source's current content.
    ///
    /// Delegate builders call this to construct the new delegate.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be read.
    fn read_to_string(&self) -> Result<String>;
}
