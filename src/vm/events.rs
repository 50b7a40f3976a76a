use crate::common::{FrameIndex, PageNumber, Pid};

/// Emitted once for every resolved page fault, in fault order.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultEvent {
    pub pid: Pid,
    pub process_name: String,
    pub page_number: PageNumber,
    pub frame_index: FrameIndex,
    pub evicted_page: Option<PageNumber>,
    pub recovery_time_micros: f64,
    pub cumulative_faults: u64,
    pub fault_rate_percent: f64,
}

/// Receives fault notifications.
///
/// Called with the manager's lock held, so implementations must not call
/// back into the manager.
pub trait FaultObserver: Send {
    fn on_fault(&mut self, event: &FaultEvent);
}

impl<F> FaultObserver for F
where
    F: FnMut(&FaultEvent) + Send,
{
    fn on_fault(&mut self, event: &FaultEvent) {
        self(event)
    }
}
