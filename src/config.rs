use std::fmt;
use std::time::Duration;

use crate::debugger::DebugLevel;
use crate::policy::PolicyKind;

pub const DEFAULT_PAGE_SIZE_KB: u64 = 4;
pub const DEFAULT_FRAME_COUNT: usize = 10;
pub const DEFAULT_MIN_FRAMES: usize = 1;
pub const DEFAULT_MAX_FRAMES: usize = 256;
pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 50;
pub const DEFAULT_SEQUENCE_LENGTH: usize = 50;
/// 4 GiB of address space at the default page size.
pub const DEFAULT_MAX_PROCESS_PAGES: usize = 1 << 20;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFlag {
        flag: String,
    },
    MissingValue {
        flag: String,
    },
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    FrameCountOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },
    ProcessTooLarge {
        memory_kb: u64,
        pages: usize,
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFlag { flag } => write!(f, "config error: unknown flag '{}'", flag),
            ConfigError::MissingValue { flag } => {
                write!(f, "config error: flag '{}' expects --{}=<value>", flag, flag)
            }
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "config error: invalid {} '{}' ({})", key, value, reason)
            }
            ConfigError::FrameCountOutOfRange {
                requested,
                min,
                max,
            } => write!(
                f,
                "config error: frame count {} outside [{}, {}]",
                requested, min, max
            ),
            ConfigError::ProcessTooLarge {
                memory_kb,
                pages,
                max,
            } => write!(
                f,
                "config error: {}KB needs {} pages, more than the {} page limit",
                memory_kb, pages, max
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Construction-time settings of the memory manager and its driver.
#[derive(Debug, Clone, PartialEq)]
pub struct VmConfig {
    pub page_size_kb: u64,
    pub frame_count: usize,
    pub policy: PolicyKind,
    pub min_frames: usize,
    pub max_frames: usize,
    /// How many upcoming accesses Optimal may look at.
    pub lookahead_window: usize,
    pub sequence_length: usize,
    /// Largest address space, in pages, a single process may register with.
    pub max_process_pages: usize,
    pub tick_interval: Duration,
    pub seed: Option<u64>,
    pub debug_level: DebugLevel,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            page_size_kb: DEFAULT_PAGE_SIZE_KB,
            frame_count: DEFAULT_FRAME_COUNT,
            policy: PolicyKind::Lru,
            min_frames: DEFAULT_MIN_FRAMES,
            max_frames: DEFAULT_MAX_FRAMES,
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            max_process_pages: DEFAULT_MAX_PROCESS_PAGES,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
            debug_level: DebugLevel::Off,
        }
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: "not a number".into(),
    })
}

impl VmConfig {
    /// Builds a config from `--key=value` flags, starting from defaults.
    /// Anything not starting with `--` is ignored.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = VmConfig::default();

        for arg in args {
            let Some(flag) = arg.as_ref().strip_prefix("--") else {
                continue;
            };
            let (key, value) = match flag.split_once('=') {
                Some(kv) => kv,
                None => {
                    return Err(ConfigError::MissingValue {
                        flag: flag.to_string(),
                    });
                }
            };

            match key {
                "frames" => cfg.frame_count = parse_num("frame count", value)?,
                "page-size" => cfg.page_size_kb = parse_num("page size", value)?,
                "policy" => {
                    cfg.policy = value.parse().map_err(|e| ConfigError::InvalidValue {
                        key: "policy",
                        value: value.to_string(),
                        reason: format!("{}", e),
                    })?
                }
                "min-frames" => cfg.min_frames = parse_num("min frames", value)?,
                "max-frames" => cfg.max_frames = parse_num("max frames", value)?,
                "lookahead" => cfg.lookahead_window = parse_num("lookahead", value)?,
                "sequence-length" => cfg.sequence_length = parse_num("sequence length", value)?,
                "max-process-pages" => {
                    cfg.max_process_pages = parse_num("max process pages", value)?
                }
                "tick-ms" => {
                    cfg.tick_interval = Duration::from_millis(parse_num("tick interval", value)?)
                }
                "seed" => cfg.seed = Some(parse_num("seed", value)?),
                "debug" => cfg.debug_level = DebugLevel::from_u8(parse_num("debug level", value)?),
                other => {
                    return Err(ConfigError::UnknownFlag {
                        flag: other.to_string(),
                    });
                }
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size_kb == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page size",
                value: "0".into(),
                reason: "must be at least 1 KB".into(),
            });
        }
        if self.lookahead_window == 0 {
            return Err(ConfigError::InvalidValue {
                key: "lookahead",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_process_pages == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max process pages",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.min_frames == 0 || self.min_frames > self.max_frames {
            return Err(ConfigError::InvalidValue {
                key: "frame bounds",
                value: format!("{}..={}", self.min_frames, self.max_frames),
                reason: "need 1 <= min <= max".into(),
            });
        }
        self.check_frame_count(self.frame_count)
    }

    pub fn check_frame_count(&self, n: usize) -> Result<(), ConfigError> {
        if n < self.min_frames || n > self.max_frames {
            return Err(ConfigError::FrameCountOutOfRange {
                requested: n,
                min: self.min_frames,
                max: self.max_frames,
            });
        }
        Ok(())
    }

    /// Page count for a process of `memory_kb`, or an error when it exceeds
    /// `max_process_pages`.
    pub fn process_pages(&self, memory_kb: u64) -> Result<usize, ConfigError> {
        let pages = crate::common::pages_for(memory_kb, self.page_size_kb);
        if pages > self.max_process_pages {
            return Err(ConfigError::ProcessTooLarge {
                memory_kb,
                pages,
                max: self.max_process_pages,
            });
        }
        Ok(pages)
    }
}
