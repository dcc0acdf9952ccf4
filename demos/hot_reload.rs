//! Example demonstrating automatic delegate rebuilds driven by file polling.
//!
//! This example shows how to:
//! - Build a query-mapping registry from a TOML mapping file
//! - Poll the file for timestamp changes and rebuild automatically
//! - Read through a stable proxy that survives every rebuild
//!
//! Run with: cargo run --example hot_reload
//!
//! While running, edit the printed mappers file to see the registry rebuild.

use hotswap_factory::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The expensive resource: statement id -> SQL text.
struct MapperRegistry {
    statements: HashMap<String, String>,
}

fn parse_mappers(sources: &[Arc<dyn ConfigSource>]) -> Result<MapperRegistry> {
    let mut statements = HashMap::new();
    for source in sources {
        let table: HashMap<String, String> =
            toml::from_str(&source.read_to_string()?).map_err(FactoryError::build)?;
        statements.extend(table);
    }
    Ok(MapperRegistry { statements })
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Hot Reload Example ===\n");

    let dir = std::env::temp_dir().join("hotswap-factory-demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("mappers.toml");
    if !path.exists() {
        std::fs::write(
            &path,
            "find_user = \"SELECT * FROM users WHERE id = ?\"\n\
             find_order = \"SELECT * FROM orders WHERE id = ?\"\n",
        )?;
    }

    let factory = HotswapFactory::builder(parse_mappers)
        .with_file(&path)
        .poll_interval(Duration::from_millis(500))
        .build()?;
    let proxy = factory.proxy();

    println!("Watching {}", path.display());
    println!("Edit it (or break its TOML) and watch the registry follow.\n");

    for _ in 0..60 {
        let count = proxy.with(|registry| registry.statements.len());
        let sample = proxy.with(|registry| registry.statements.get("find_user").cloned());
        println!("{count} statement(s) loaded; find_user = {sample:?}");
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    factory.shutdown();
    Ok(())
}
