use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::common::{FrameIndex, LogicalPage, PageNumber, Pid};
use crate::config::VmConfig;
use crate::debugger::{Component, Logger};
use crate::error::VmResult;
use crate::policy::{PolicyKind, PolicyStats, ReplacementPolicy};
use crate::process::ProcessInfo;
use crate::vm::events::{FaultEvent, FaultObserver};
use crate::vm::record::ProcessRecord;
use crate::vm::recovery::RecoverySamples;
use crate::vm::workload::generate_access_sequence;
use crate::{vm_debug, vm_error, vm_info, vm_trace, vm_warn};

pub type MemoryManagerHandle = Arc<MemoryManager>;

/// What a single `access_page` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessOutcome {
    /// Unknown pid or a page outside the process's address space.
    Ignored,
    Hit,
    Fault(FaultEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStats {
    pub total_processes: usize,
    pub total_faults: u64,
    pub total_accesses: u64,
    pub fault_rate_percent: f64,
    pub avg_recovery_time_micros: f64,
    pub frames_used: usize,
    pub frames_total: usize,
    /// Times frame allocation could not find the evicted page.
    pub inconsistencies: u64,
    pub policy_name: &'static str,
    pub policy: PolicyStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub frame_index: FrameIndex,
    pub pid: Option<Pid>,
    pub page_number: Option<PageNumber>,
    pub process_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    pub pid: Pid,
    pub name: String,
    pub memory_kb: u64,
    pub pages_needed: usize,
    pub resident_pages: usize,
}

struct ManagerState {
    processes: BTreeMap<Pid, ProcessRecord>,
    page_tables: HashMap<Pid, Vec<Option<FrameIndex>>>,
    frames: Vec<Option<LogicalPage>>,
    policy: ReplacementPolicy,
    total_faults: u64,
    total_accesses: u64,
    inconsistencies: u64,
    recovery: RecoverySamples,
    observer: Option<Box<dyn FaultObserver>>,
    rng: StdRng,
}

impl ManagerState {
    fn clear_residency(&mut self) {
        self.frames.iter_mut().for_each(|f| *f = None);
        for table in self.page_tables.values_mut() {
            table.iter_mut().for_each(|e| *e = None);
        }
    }

    fn release(&mut self, pid: Pid) -> usize {
        let mut released = 0;
        for frame in self.frames.iter_mut() {
            if frame.is_some_and(|lp| lp.pid == pid) {
                *frame = None;
                released += 1;
            }
        }
        self.page_tables.remove(&pid);
        self.processes.remove(&pid);
        released
    }

    fn unmap(&mut self, occupant: LogicalPage) {
        if let Some(entry) = self
            .page_tables
            .get_mut(&occupant.pid)
            .and_then(|t| t.get_mut(occupant.page))
        {
            *entry = None;
        }
    }

    /// Picks a frame for `(pid, page)`: the first free one, else the frame
    /// holding the page the policy evicted, else frame 0.
    fn allocate_frame(
        &mut self,
        pid: Pid,
        page: PageNumber,
        evicted: Option<PageNumber>,
        logger: &Logger,
    ) -> FrameIndex {
        let frame = match self.frames.iter().position(Option::is_none) {
            Some(free) => free,
            None => {
                let holder = evicted.and_then(|ev| {
                    self.frames
                        .iter()
                        .position(|f| f.is_some_and(|lp| lp.page == ev))
                });
                match holder {
                    Some(idx) => idx,
                    None => {
                        self.inconsistencies += 1;
                        vm_error!(
                            logger,
                            Component::Manager,
                            "evicted page {:?} not found in any frame while placing {}; reusing frame 0",
                            evicted,
                            LogicalPage::new(pid, page)
                        );
                        0
                    }
                }
            }
        };

        if let Some(old) = self.frames[frame].take() {
            self.unmap(old);
        }
        self.frames[frame] = Some(LogicalPage::new(pid, page));
        frame
    }

    fn access(
        &mut self,
        pid: Pid,
        page: PageNumber,
        lookahead: &[PageNumber],
        logger: &Logger,
    ) -> AccessOutcome {
        let mapped = match self.page_tables.get(&pid).and_then(|t| t.get(page)) {
            Some(entry) => *entry,
            None => return AccessOutcome::Ignored,
        };

        self.total_accesses += 1;

        if let Some(frame) = mapped {
            self.policy.resolve(page, lookahead);
            vm_trace!(logger, Component::Manager, "hit {}:{} in frame {}", pid, page, frame);
            return AccessOutcome::Hit;
        }

        let started = Instant::now();
        let resolution = self.policy.resolve(page, lookahead);
        if !resolution.is_fault {
            return AccessOutcome::Hit;
        }

        self.total_faults += 1;
        let frame = self.allocate_frame(pid, page, resolution.evicted, logger);
        if let Some(entry) = self.page_tables.get_mut(&pid).and_then(|t| t.get_mut(page)) {
            *entry = Some(frame);
        }
        let recovery_time_micros = started.elapsed().as_secs_f64() * 1_000_000.0;
        self.recovery.push(recovery_time_micros);

        let event = FaultEvent {
            pid,
            process_name: self
                .processes
                .get(&pid)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            page_number: page,
            frame_index: frame,
            evicted_page: resolution.evicted,
            recovery_time_micros,
            cumulative_faults: self.total_faults,
            fault_rate_percent: percent(self.total_faults, self.total_accesses),
        };

        vm_debug!(
            logger,
            Component::Manager,
            "fault {}:{} -> frame {} (evicted {:?})",
            pid,
            page,
            frame,
            resolution.evicted
        );

        if let Some(observer) = self.observer.as_mut() {
            observer.on_fault(&event);
        }

        AccessOutcome::Fault(event)
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Maps tracked processes' pages onto a fixed pool of frames.
///
/// All frame, page-table and policy state sits behind one mutex; every
/// public operation holds it for its whole duration, so readers never see a
/// frame and a page-table entry that disagree.
pub struct MemoryManager {
    config: VmConfig,
    state: Mutex<ManagerState>,
    logger: Logger,
}

impl MemoryManager {
    pub fn new(config: VmConfig, logger: Logger) -> VmResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let state = ManagerState {
            processes: BTreeMap::new(),
            page_tables: HashMap::new(),
            frames: vec![None; config.frame_count],
            policy: ReplacementPolicy::new(config.policy, config.frame_count),
            total_faults: 0,
            total_accesses: 0,
            inconsistencies: 0,
            recovery: RecoverySamples::new(),
            observer: None,
            rng,
        };

        vm_info!(
            logger,
            Component::Manager,
            "{} frames, {}KB pages, {} replacement",
            config.frame_count,
            config.page_size_kb,
            config.policy
        );

        Ok(Self {
            config,
            state: Mutex::new(state),
            logger,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Starts tracking a process. Frames are not touched; a pid that is
    /// already tracked is released and replaced. Returns the page count.
    ///
    /// A process needing more than `max_process_pages` is rejected and any
    /// earlier registration under the same pid is kept.
    pub fn register_process(&self, info: ProcessInfo) -> VmResult<usize> {
        let pages = match self.config.process_pages(info.memory_kb) {
            Ok(pages) => pages,
            Err(e) => {
                vm_warn!(
                    self.logger,
                    Component::Manager,
                    "refusing {} ({}): {}",
                    info.pid,
                    info.name,
                    e
                );
                return Err(e.into());
            }
        };

        let mut state = self.lock();

        if state.processes.contains_key(&info.pid) {
            state.release(info.pid);
        }

        let sequence = generate_access_sequence(pages, self.config.sequence_length, &mut state.rng);
        let record = ProcessRecord::new(info, self.config.page_size_kb, sequence);

        vm_info!(
            self.logger,
            Component::Manager,
            "registered {} ({}) {}KB, {} pages",
            record.pid,
            record.name,
            record.memory_kb,
            record.pages_needed
        );

        state.page_tables.insert(record.pid, vec![None; record.pages_needed]);
        state.processes.insert(record.pid, record);
        Ok(pages)
    }

    /// Stops tracking `pid` and frees its frames. Unknown pids are ignored.
    pub fn unregister_process(&self, pid: Pid) -> bool {
        let mut state = self.lock();
        if !state.processes.contains_key(&pid) {
            return false;
        }
        let released = state.release(pid);
        vm_info!(
            self.logger,
            Component::Manager,
            "unregistered {}, released {} frames",
            pid,
            released
        );
        true
    }

    pub fn is_registered(&self, pid: Pid) -> bool {
        self.lock().processes.contains_key(&pid)
    }

    /// Switches the replacement policy by name. Fails before touching any
    /// state when the name is unknown.
    pub fn set_policy(&self, name: &str) -> VmResult<()> {
        let mut state = self.lock();
        let policy = ReplacementPolicy::from_name(name, state.frames.len())?;
        self.install_policy(&mut state, policy);
        Ok(())
    }

    /// Installs a fresh `kind` policy and empties every frame.
    pub fn set_policy_kind(&self, kind: PolicyKind) {
        let mut state = self.lock();
        let policy = ReplacementPolicy::new(kind, state.frames.len());
        self.install_policy(&mut state, policy);
    }

    fn install_policy(&self, state: &mut ManagerState, policy: ReplacementPolicy) {
        let kind = policy.kind();
        state.policy = policy;
        state.clear_residency();
        vm_info!(self.logger, Component::Policy, "policy set to {}", kind);
    }

    /// Resizes the frame pool. All residency is dropped, which also covers
    /// pages that lived in frames removed by a shrink.
    pub fn set_frame_count(&self, n: usize) -> VmResult<()> {
        self.config.check_frame_count(n)?;

        let mut state = self.lock();
        let kind = state.policy.kind();
        state.frames = vec![None; n];
        state.clear_residency();
        state.policy = ReplacementPolicy::new(kind, n);
        vm_info!(self.logger, Component::Manager, "frame count set to {}", n);
        Ok(())
    }

    pub fn set_observer(&self, observer: impl FaultObserver + 'static) {
        self.lock().observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&self) {
        self.lock().observer = None;
    }

    /// The fault-resolution path. `lookahead` is trimmed to the configured
    /// window before the policy sees it.
    pub fn access_page(
        &self,
        pid: Pid,
        page: PageNumber,
        lookahead: &[PageNumber],
    ) -> AccessOutcome {
        let window = &lookahead[..lookahead.len().min(self.config.lookahead_window)];
        self.lock().access(pid, page, window, &self.logger)
    }

    /// Chooses a random tracked process and advances its replay by one.
    pub fn next_access<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<(Pid, PageNumber, Vec<PageNumber>)> {
        let mut state = self.lock();
        let candidates: Vec<Pid> = state
            .processes
            .values()
            .filter(|p| p.has_sequence())
            .map(|p| p.pid)
            .collect();
        let pid = *candidates.choose(rng)?;
        let (page, lookahead) = state
            .processes
            .get_mut(&pid)?
            .next_access(self.config.lookahead_window)?;
        Some((pid, page, lookahead))
    }

    /// One simulation tick: select outside the access, then access.
    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<AccessOutcome> {
        let (pid, page, lookahead) = self.next_access(rng)?;
        Some(self.access_page(pid, page, &lookahead))
    }

    pub fn statistics(&self) -> MemoryStats {
        let state = self.lock();
        MemoryStats {
            total_processes: state.processes.len(),
            total_faults: state.total_faults,
            total_accesses: state.total_accesses,
            fault_rate_percent: percent(state.total_faults, state.total_accesses),
            avg_recovery_time_micros: state.recovery.average(),
            frames_used: state.frames.iter().filter(|f| f.is_some()).count(),
            frames_total: state.frames.len(),
            inconsistencies: state.inconsistencies,
            policy_name: state.policy.name(),
            policy: state.policy.stats(),
        }
    }

    pub fn frame_snapshot(&self) -> Vec<FrameView> {
        let state = self.lock();
        state
            .frames
            .iter()
            .enumerate()
            .map(|(idx, occupant)| match occupant {
                Some(lp) => FrameView {
                    frame_index: idx,
                    pid: Some(lp.pid),
                    page_number: Some(lp.page),
                    process_name: state.processes.get(&lp.pid).map(|p| p.name.clone()),
                },
                None => FrameView {
                    frame_index: idx,
                    pid: None,
                    page_number: None,
                    process_name: None,
                },
            })
            .collect()
    }

    pub fn processes(&self) -> Vec<ProcessView> {
        let state = self.lock();
        state
            .processes
            .values()
            .map(|p| ProcessView {
                pid: p.pid,
                name: p.name.clone(),
                memory_kb: p.memory_kb,
                pages_needed: p.pages_needed,
                resident_pages: state
                    .page_tables
                    .get(&p.pid)
                    .map(|t| t.iter().filter(|e| e.is_some()).count())
                    .unwrap_or(0),
            })
            .collect()
    }

    pub fn page_table(&self, pid: Pid) -> Option<Vec<Option<FrameIndex>>> {
        self.lock().page_tables.get(&pid).cloned()
    }

    pub fn access_sequence(&self, pid: Pid) -> Option<Vec<PageNumber>> {
        self.lock()
            .processes
            .get(&pid)
            .map(|p| p.sequence().iter().copied().collect())
    }

    /// Page numbers the policy holds. LRU lists least recent first, the
    /// other policies list admission order.
    pub fn resident_order(&self) -> Vec<PageNumber> {
        self.lock().policy.resident_pages()
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.lock().policy.kind()
    }

    pub fn frame_count(&self) -> usize {
        self.lock().frames.len()
    }

    /// Verifies that frames and page tables point at each other and that
    /// the policy holds no more pages than there are frames.
    pub fn check_consistency(&self) -> Result<(), String> {
        let state = self.lock();

        for (idx, occupant) in state.frames.iter().enumerate() {
            if let Some(lp) = occupant {
                let entry = state
                    .page_tables
                    .get(&lp.pid)
                    .and_then(|t| t.get(lp.page))
                    .copied()
                    .flatten();
                if entry != Some(idx) {
                    return Err(format!("frame {} holds {} but its entry is {:?}", idx, lp, entry));
                }
            }
        }

        for (pid, table) in &state.page_tables {
            for (page, entry) in table.iter().enumerate() {
                if let Some(frame) = entry {
                    let occupant = state.frames.get(*frame).copied().flatten();
                    if occupant != Some(LogicalPage::new(*pid, page)) {
                        return Err(format!(
                            "{}:{} maps to frame {} which holds {:?}",
                            pid, page, frame, occupant
                        ));
                    }
                }
            }
        }

        if state.policy.resident_count() > state.frames.len() {
            return Err(format!(
                "policy holds {} pages for {} frames",
                state.policy.resident_count(),
                state.frames.len()
            ));
        }

        Ok(())
    }
}
