//! Example demonstrating runtime control of the polling scheduler.
//!
//! This example shows how to:
//! - Build with polling disabled (interval 0 is a valid configuration)
//! - Enable and change the poll interval at runtime
//! - Tear the scheduler down while the delegate stays readable
//!
//! Run with: cargo run --example poll_interval

use hotswap_factory::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn read_all(sources: &[Arc<dyn ConfigSource>]) -> Result<String> {
    let mut combined = String::new();
    for source in sources {
        combined.push_str(&source.read_to_string()?);
    }
    Ok(combined)
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Poll Interval Example ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("query.sql");
    std::fs::write(&path, "SELECT 1")?;

    // Polling disabled at build time.
    let factory = HotswapFactory::builder(read_all).with_file(&path).build()?;
    let proxy = factory.proxy();
    println!("polling: {}; delegate: {}", factory.is_polling(), proxy.current());

    // An edit goes unnoticed while polling is off. The generous sleep keeps
    // the new timestamp distinguishable on coarse filesystems.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    std::fs::write(&path, "SELECT 2")?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("after edit, still: {}", proxy.current());

    // Raise the interval from zero: the pre-toggle edit is caught on the
    // first tick of the new schedule.
    factory.set_poll_interval(Duration::from_millis(100));
    println!("polling: {}", factory.is_polling());
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("after enabling polling: {}", proxy.current());

    // Teardown stops future ticks; reads keep working.
    factory.shutdown();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    std::fs::write(&path, "SELECT 3")?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("after shutdown, still: {}", proxy.current());

    Ok(())
}
