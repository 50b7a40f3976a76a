use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl DebugLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => DebugLevel::Off,
            1 => DebugLevel::Error,
            2 => DebugLevel::Warn,
            3 => DebugLevel::Info,
            4 => DebugLevel::Debug,
            _ => DebugLevel::Trace,
        }
    }
}

/// Subsystem tag printed next to every log line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Component {
    Policy,
    Manager,
    Simulator,
    Process,
    Shell,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Policy => "policy",
            Component::Manager => "manager",
            Component::Simulator => "simulator",
            Component::Process => "process",
            Component::Shell => "shell",
        };
        f.write_str(name)
    }
}

/// Destination for log lines. Components receive one at construction and
/// never reach for a global.
pub trait LogSink: Send + Sync {
    fn enabled(&self, level: DebugLevel) -> bool;
    fn record(&self, level: DebugLevel, component: Component, message: &str);
}

pub type Logger = Arc<dyn LogSink>;

pub mod color {
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
    pub const BLUE: &str = "\x1b[34m";
    pub const GRAY: &str = "\x1b[90m";
    pub const RESET: &str = "\x1b[0m";
}

fn passes(threshold: u8, level: DebugLevel) -> bool {
    level != DebugLevel::Off && (level as u8) <= threshold
}

/// Colored `LEVEL [component] message` lines on stderr.
pub struct StderrSink {
    level: AtomicU8,
}

impl StderrSink {
    pub fn new(level: DebugLevel) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
        }
    }

    pub fn set_level(&self, level: DebugLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> DebugLevel {
        DebugLevel::from_u8(self.level.load(Ordering::Relaxed))
    }
}

impl LogSink for StderrSink {
    fn enabled(&self, level: DebugLevel) -> bool {
        passes(self.level.load(Ordering::Relaxed), level)
    }

    fn record(&self, level: DebugLevel, component: Component, message: &str) {
        use color::*;
        let level_str = match level {
            DebugLevel::Error => format!("{}ERROR{}", RED, RESET),
            DebugLevel::Warn => format!("{}WARN{}", YELLOW, RESET),
            DebugLevel::Info => format!("{}INFO{}", GREEN, RESET),
            DebugLevel::Debug => format!("{}DEBUG{}", BLUE, RESET),
            DebugLevel::Trace => format!("{}TRACE{}", GRAY, RESET),
            DebugLevel::Off => return,
        };
        eprintln!("{} [{}] {}", level_str, component, message);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub level: DebugLevel,
    pub component: Component,
    pub message: String,
}

/// Keeps every record in memory. Used by tests to assert on diagnostics.
pub struct MemorySink {
    level: DebugLevel,
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new(level: DebugLevel) -> Self {
        Self {
            level,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, level: DebugLevel, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn enabled(&self, level: DebugLevel) -> bool {
        passes(self.level as u8, level)
    }

    fn record(&self, level: DebugLevel, component: Component, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level,
                component,
                message: message.to_string(),
            });
    }
}

pub struct NullSink;

impl LogSink for NullSink {
    fn enabled(&self, _level: DebugLevel) -> bool {
        false
    }

    fn record(&self, _level: DebugLevel, _component: Component, _message: &str) {}
}

pub fn null_logger() -> Logger {
    Arc::new(NullSink)
}
