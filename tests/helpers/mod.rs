pub mod data;
pub mod harness;

use std::sync::Arc;

use pagesim::debugger::{DebugLevel, Logger, StderrSink};

/// Logger for integration tests, level taken from `RUST_LOG` (off by default).
#[allow(dead_code)]
pub fn test_logger() -> Logger {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| match s.to_uppercase().as_str() {
            "OFF" => Some(DebugLevel::Off),
            "ERROR" => Some(DebugLevel::Error),
            "WARN" => Some(DebugLevel::Warn),
            "INFO" => Some(DebugLevel::Info),
            "DEBUG" => Some(DebugLevel::Debug),
            "TRACE" => Some(DebugLevel::Trace),
            _ => None,
        })
        .unwrap_or(DebugLevel::Off);

    Arc::new(StderrSink::new(level))
}
