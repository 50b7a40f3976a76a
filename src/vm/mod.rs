pub mod events;
pub mod manager;
pub mod record;
pub mod recovery;
pub mod simulator;
pub mod workload;

pub use events::{FaultEvent, FaultObserver};
pub use manager::{
    AccessOutcome, FrameView, MemoryManager, MemoryManagerHandle, MemoryStats, ProcessView,
};
pub use record::ProcessRecord;
pub use simulator::Simulator;
