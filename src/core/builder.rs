//! Builder for constructing HotswapFactory instances.

use crate::core::{DelegateBuilder, HotswapFactory};
use crate::error::Result;
use crate::sources::{ConfigSource, FileSource};
use crate::watch::{Poller, WatchOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing a [`HotswapFactory`] instance.
///
/// Collects the configuration sources and the poll interval, performs the
/// initial delegate build, and wires up the polling scheduler.
///
/// # Examples
///
/// ```rust,no_run
/// use hotswap_factory::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<()> {
/// let factory = HotswapFactory::builder(|sources: &[Arc<dyn ConfigSource>]| -> Result<usize> {
///     Ok(sources.len())
/// })
/// .with_file("mappers/user.toml")
/// .with_file("mappers/order.toml")
/// .poll_interval(Duration::from_millis(500))
/// .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FactoryBuilder<B: DelegateBuilder> {
    delegate_builder: B,
    sources: Vec<Arc<dyn ConfigSource>>,
    poll_interval: Duration,
}

impl<B: DelegateBuilder + 'static> FactoryBuilder<B> {
    /// Create a new builder around the given delegate builder.
    ///
    /// Polling starts disabled; enable it with
    /// [`poll_interval`](Self::poll_interval).
    pub fn new(delegate_builder: B) -> Self {
        Self {
            delegate_builder,
            sources: Vec::new(),
            poll_interval: Duration::ZERO,
        }
    }

    /// Add a file-backed configuration source.
    ///
    /// Sources are handed to the delegate builder in the order they are
    /// added.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Arc::new(FileSource::new(path)));
        self
    }

    /// Add a custom configuration source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Set the polling interval for change detection.
    ///
    /// A zero interval leaves the scheduler stopped — polling disabled is a
    /// valid configuration, not an error.
    pub fn poll_interval(mut self, every: Duration) -> Self {
        self.poll_interval = every;
        self
    }

    /// Apply options from the embedding system's configuration surface.
    ///
    /// Appends one file source per configured path and adopts the
    /// configured poll interval.
    pub fn with_options(mut self, options: &WatchOptions) -> Self {
        for path in &options.sources {
            self.sources.push(Arc::new(FileSource::new(path)));
        }
        self.poll_interval = options.poll_interval();
        self
    }

    /// Build the factory handle.
    ///
    /// Performs the initial delegate build and, when the poll interval is
    /// positive, starts the polling scheduler. Starting the scheduler
    /// spawns a Tokio task, so `build()` must then be called within a Tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns the delegate builder's error if the initial build fails; no
    /// factory handle exists without a first delegate.
    pub fn build(self) -> Result<HotswapFactory<B>> {
        let initial = self.delegate_builder.build(&self.sources)?;
        let handle = HotswapFactory::from_parts(initial, self.delegate_builder, self.sources);

        let poller = Arc::new(Poller::new(handle.clone()));
        if !self.poll_interval.is_zero() {
            poller.start(self.poll_interval);
        }
        Ok(handle.with_poller(poller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn source_counter() -> impl DelegateBuilder<Delegate = usize> {
        |sources: &[Arc<dyn ConfigSource>]| -> Result<usize> { Ok(sources.len()) }
    }

    #[test]
    fn builder_accumulates_sources() {
        let builder = FactoryBuilder::new(source_counter())
            .with_file("a.toml")
            .with_file("b.toml")
            .with_source(FileSource::new("c.toml"));

        assert_eq!(builder.sources.len(), 3);
    }

    #[test]
    fn build_performs_the_initial_build() {
        let factory = FactoryBuilder::new(source_counter())
            .with_file("a.toml")
            .with_file("b.toml")
            .build()
            .unwrap();

        assert_eq!(*factory.current(), 2);
        assert!(!factory.is_polling());
    }

    #[test]
    fn initial_build_failure_propagates() {
        let failing = |_: &[Arc<dyn ConfigSource>]| -> Result<usize> {
            Err(crate::error::FactoryError::build("no sources"))
        };
        assert!(FactoryBuilder::new(failing).build().is_err());
    }

    #[test]
    fn options_feed_sources_and_interval() {
        let options = WatchOptions {
            poll_interval_millis: 250,
            sources: vec!["a.toml".into(), "b.toml".into()],
        };
        let builder = FactoryBuilder::new(source_counter()).with_options(&options);

        assert_eq!(builder.sources.len(), 2);
        assert_eq!(builder.poll_interval, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn positive_interval_starts_polling() {
        let factory = FactoryBuilder::new(source_counter())
            .poll_interval(Duration::from_millis(50))
            .build()
            .unwrap();

        assert!(factory.is_polling());
        factory.shutdown();
        assert!(!factory.is_polling());
    }
}
