use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    UnknownPolicy { name: String },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::UnknownPolicy { name } => {
                write!(
                    f,
                    "policy error: unknown replacement policy '{}' (expected FIFO, LRU, LFU or Optimal)",
                    name
                )
            }
        }
    }
}

impl std::error::Error for PolicyError {}
