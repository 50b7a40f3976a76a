pub mod types;

pub use types::{FrameIndex, LogicalPage, PageNumber, Pid, pages_for};
