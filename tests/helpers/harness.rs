use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagesim::common::{PageNumber, Pid};
use pagesim::config::VmConfig;
use pagesim::policy::PolicyKind;
use pagesim::process::ProcessInfo;
use pagesim::vm::{AccessOutcome, FaultEvent, MemoryManager, MemoryManagerHandle};

use super::test_logger;

pub struct TestVm {
    pub manager: MemoryManagerHandle,
    pub faults: Arc<Mutex<Vec<FaultEvent>>>,
}

#[allow(dead_code)]
impl TestVm {
    pub fn new(policy: PolicyKind, frames: usize) -> Self {
        Self::with_config(VmConfig {
            frame_count: frames,
            policy,
            seed: Some(1234),
            tick_interval: Duration::from_millis(1),
            ..VmConfig::default()
        })
    }

    pub fn with_config(config: VmConfig) -> Self {
        let manager = Arc::new(MemoryManager::new(config, test_logger()).unwrap());
        let faults: Arc<Mutex<Vec<FaultEvent>>> = Arc::default();
        let sink = faults.clone();
        manager.set_observer(move |ev: &FaultEvent| sink.lock().unwrap().push(ev.clone()));
        Self { manager, faults }
    }

    pub fn add(&self, pid: Pid, name: &str, memory_kb: u64) -> usize {
        self.manager
            .register_process(ProcessInfo::new(pid, name, memory_kb))
            .unwrap()
    }

    /// Replays `pages` for `pid`, handing each access the rest of the trace
    /// as lookahead.
    pub fn run_trace(&self, pid: Pid, pages: &[PageNumber]) -> Vec<AccessOutcome> {
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| self.manager.access_page(pid, *page, &pages[i + 1..]))
            .collect()
    }

    pub fn fault_pages(&self) -> Vec<PageNumber> {
        self.faults
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.page_number)
            .collect()
    }

    pub fn fault_count(&self) -> usize {
        self.faults.lock().unwrap().len()
    }
}
