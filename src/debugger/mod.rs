pub mod debugger;
mod macros;

pub use debugger::{
    Component, DebugLevel, LogRecord, LogSink, Logger, MemorySink, NullSink, StderrSink,
    null_logger,
};
