//! Shared integration test setup
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use stormwatch_core::time::parse_timestamp;
use stormwatch_core::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Route engine logs through the test harness once per test binary (`RUST_LOG` to see them)
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default configuration on a 0.1° grid to keep runs short
pub fn coarse_config() -> EngineConfig {
    EngineConfig {
        grid_resolution_deg: 0.1,
        ..EngineConfig::default()
    }
}

pub fn at(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).expect("valid test timestamp")
}
