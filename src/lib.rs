//! # hotswap-factory
//!
//! Hot-reloadable factory handles: rebuild expensive resources when their
//! configuration sources change, without stale or blocked readers.
//!
//! ## Overview
//!
//! `hotswap-factory` wraps an expensive-to-build resource (a "delegate" —
//! think query-mapping registries, session factories, compiled rule sets)
//! behind a long-lived handle that:
//! - serves lock-free reads of the current delegate using `arc-swap`
//! - polls the delegate's configuration sources for timestamp changes
//! - rebuilds and atomically swaps the delegate when a source changes
//! - keeps serving the previous delegate when a rebuild fails
//!
//! Callers hold one [`FactoryProxy`](core::FactoryProxy) for the life of the
//! application; every call through it is forwarded to whatever delegate is
//! current at dispatch time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hotswap_factory::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! /// The expensive resource: statement id -> SQL text.
//! struct MapperRegistry {
//!     statements: std::collections::HashMap<String, String>,
//! }
//!
//! fn parse_mappers(sources: &[Arc<dyn ConfigSource>]) -> Result<MapperRegistry> {
//!     let mut statements = std::collections::HashMap::new();
//!     for source in sources {
//!         for line in source.read_to_string()?.lines() {
//!             if let Some((id, sql)) = line.split_once('=') {
//!                 statements.insert(id.trim().to_string(), sql.trim().to_string());
//!             }
//!         }
//!     }
//!     Ok(MapperRegistry { statements })
//! }
//!
//! # async fn example() -> Result<()> {
//! let factory = HotswapFactory::builder(parse_mappers)
//!     .with_file("mappers/user.properties")
//!     .poll_interval(Duration::from_millis(500))
//!     .build()?;
//!
//! // A stable handle, valid across arbitrarily many rebuilds.
//! let proxy = factory.proxy();
//! let sql = proxy.with(|registry| registry.statements.get("find_user").cloned());
//!
//! // Explicit teardown stops polling; the delegate stays readable.
//! factory.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Lock-free reads**: [`current()`](core::HotswapFactory::current) is an
//!   atomic pointer load; readers never block each other or a rebuild.
//! - **Atomic swap**: no caller ever observes a half-built delegate; once
//!   `refresh()` returns, every subsequent read sees the new delegate.
//! - **Degrade, never crash**: a failed rebuild is logged and the previous
//!   delegate stays current; a failed timestamp read skips that source for
//!   the tick and the scan continues.
//! - **Serial ticks**: change detection runs on one scheduler task; ticks
//!   never overlap.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;
pub mod watch;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{DelegateBuilder, FactoryBuilder, FactoryProxy, HotswapFactory};
    pub use crate::error::{FactoryError, Result};
    pub use crate::sources::{ConfigSource, FileSource};
    pub use crate::watch::WatchOptions;
}
