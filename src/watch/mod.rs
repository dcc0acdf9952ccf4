//! Change detection and the polling scheduler.
//!
//! Change detection is timestamp polling, not filesystem events: every tick
//! the [`ChangeTracker`] compares each source's modification timestamp with
//! the last one it observed, and the [`Poller`] triggers a rebuild when any
//! source moved.

mod poller;
mod tracker;

pub use poller::Poller;
pub use tracker::ChangeTracker;

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Watch options recognized by the embedding system's configuration
/// surface.
///
/// Deserializable so host applications can carry it inside their own
/// config:
///
/// ```rust
/// # use hotswap_factory::watch::WatchOptions;
/// let options: WatchOptions = toml::from_str(
///     r#"
///     poll_interval_millis = 500
///     sources = ["mappers/user.toml", "mappers/order.toml"]
///     "#,
/// )
/// .unwrap();
/// assert_eq!(options.poll_interval_millis, 500);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    /// Poll interval in milliseconds; `0` disables polling.
    pub poll_interval_millis: u64,

    /// Configuration source locators, in the order the delegate builder
    /// should see them.
    pub sources: Vec<PathBuf>,
}

impl WatchOptions {
    /// The poll interval as a [`Duration`] (zero means disabled).
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}
