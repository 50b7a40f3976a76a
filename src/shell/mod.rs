pub mod command;
pub mod errors;

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::debugger::{Component, Logger};
use crate::process::{ProcessInfo, ProcessSource};
use crate::vm::{AccessOutcome, FaultEvent, MemoryManagerHandle, Simulator};
use crate::vm_info;

pub use command::{Command, HELP, parse_command};

/// Faults kept for the `log` command.
pub const FAULT_LOG_CAPACITY: usize = 200;

#[derive(Debug)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Executes shell commands against one memory manager.
pub struct Shell {
    manager: MemoryManagerHandle,
    source: Box<dyn ProcessSource>,
    simulator: Option<Simulator>,
    faults: Arc<Mutex<VecDeque<FaultEvent>>>,
    rng: StdRng,
    logger: Logger,
}

impl Shell {
    pub fn new(
        manager: MemoryManagerHandle,
        source: Box<dyn ProcessSource>,
        logger: Logger,
    ) -> Self {
        let faults: Arc<Mutex<VecDeque<FaultEvent>>> = Arc::default();
        let log = faults.clone();
        manager.set_observer(move |ev: &FaultEvent| {
            let mut log = log.lock().unwrap_or_else(PoisonError::into_inner);
            if log.len() == FAULT_LOG_CAPACITY {
                log.pop_front();
            }
            log.push_back(ev.clone());
        });

        let rng = match manager.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(2)),
            None => StdRng::from_os_rng(),
        };

        Self {
            manager,
            source,
            simulator: None,
            faults,
            rng,
            logger,
        }
    }

    pub fn manager(&self) -> &MemoryManagerHandle {
        &self.manager
    }

    pub fn is_simulating(&self) -> bool {
        self.simulator.as_ref().is_some_and(Simulator::is_running)
    }

    /// Parses and runs one line. Blank lines produce empty output.
    pub fn run_line(&mut self, line: &str) -> Result<Flow> {
        match parse_command(line)? {
            Some(cmd) => self.execute(cmd),
            None => Ok(Flow::Continue(String::new())),
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Flow> {
        let out = match cmd {
            Command::Help => HELP.to_string(),
            Command::Quit => {
                self.stop_simulation();
                return Ok(Flow::Quit);
            }
            Command::Add {
                pid,
                name,
                memory_kb,
            } => self.register(ProcessInfo::new(pid, name, memory_kb))?,
            Command::Track { pid } => {
                let info = self
                    .source
                    .lookup(pid)
                    .ok_or_else(|| anyhow!("process {} not found", pid))?;
                self.register(info)?
            }
            Command::Find { needle } => {
                let mut out = String::new();
                for p in self.source.find_by_name(&needle) {
                    let _ = writeln!(out, "{:>7}  {:<24} {:>10} KB", p.pid, p.name, p.memory_kb);
                }
                if out.is_empty() {
                    out = format!("no process matches '{}'", needle);
                }
                out.trim_end().to_string()
            }
            Command::Remove { pid } => {
                if self.manager.unregister_process(pid) {
                    format!("stopped tracking {}", pid)
                } else {
                    format!("{} is not tracked", pid)
                }
            }
            Command::Access { pid, page } => {
                let lookahead = self.manager.access_sequence(pid).unwrap_or_default();
                match self.manager.access_page(pid, page, &lookahead) {
                    AccessOutcome::Ignored => format!("{}:{} is not a tracked page", pid, page),
                    AccessOutcome::Hit => format!("hit {}:{}", pid, page),
                    AccessOutcome::Fault(ev) => describe_fault(&ev),
                }
            }
            Command::Step { count } => {
                let mut done = 0;
                for _ in 0..count {
                    if self.manager.step(&mut self.rng).is_none() {
                        break;
                    }
                    done += 1;
                }
                format!("{} accesses", done)
            }
            Command::Policy { name } => {
                self.manager.set_policy(&name)?;
                format!("policy: {}", self.manager.policy_kind())
            }
            Command::Frames { count } => {
                self.manager.set_frame_count(count)?;
                format!("frames: {}", count)
            }
            Command::Start => {
                if self.is_simulating() {
                    "simulation already running".to_string()
                } else {
                    self.simulator = Some(Simulator::start(
                        self.manager.clone(),
                        self.logger.clone(),
                    ));
                    "simulation started".to_string()
                }
            }
            Command::Stop => match self.stop_simulation() {
                Some(ticks) => format!("simulation stopped after {} accesses", ticks),
                None => "simulation not running".to_string(),
            },
            Command::Stats => self.render_stats(),
            Command::Table => self.render_table(),
            Command::Resident => {
                let pages = self.manager.resident_order();
                if pages.is_empty() {
                    "no resident pages".to_string()
                } else {
                    let pages: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
                    format!("{}: {}", self.manager.policy_kind(), pages.join(" "))
                }
            }
            Command::Processes => self.render_processes(),
            Command::Log { count } => {
                let log = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
                let skip = log.len().saturating_sub(count);
                log.iter()
                    .skip(skip)
                    .map(describe_fault)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        };
        Ok(Flow::Continue(out))
    }

    fn register(&mut self, info: ProcessInfo) -> Result<String> {
        let (pid, name) = (info.pid, info.name.clone());
        let pages = self.manager.register_process(info)?;
        vm_info!(self.logger, Component::Shell, "tracking {} ({})", pid, name);
        Ok(format!("tracking {} ({}), {} pages", pid, name, pages))
    }

    fn stop_simulation(&mut self) -> Option<u64> {
        self.simulator.take().map(|mut sim| sim.stop())
    }

    fn render_stats(&self) -> String {
        let s = self.manager.statistics();
        let mut out = String::new();
        let _ = writeln!(out, "policy            {}", s.policy_name);
        let _ = writeln!(out, "processes         {}", s.total_processes);
        let _ = writeln!(out, "frames            {}/{}", s.frames_used, s.frames_total);
        let _ = writeln!(out, "accesses          {}", s.total_accesses);
        let _ = writeln!(out, "faults            {}", s.total_faults);
        let _ = writeln!(out, "fault rate        {:.2}%", s.fault_rate_percent);
        let _ = writeln!(out, "avg recovery      {:.3} us", s.avg_recovery_time_micros);
        let _ = writeln!(out, "policy hit rate   {:.2}%", s.policy.hit_rate * 100.0);
        if s.inconsistencies > 0 {
            let _ = writeln!(out, "inconsistencies   {}", s.inconsistencies);
        }
        out.trim_end().to_string()
    }

    fn render_table(&self) -> String {
        self.manager
            .frame_snapshot()
            .iter()
            .map(|f| match (f.pid, f.page_number) {
                (Some(pid), Some(page)) => format!(
                    "{:>4}  {:>7}  {:>6}  {}",
                    f.frame_index,
                    pid,
                    page,
                    f.process_name.as_deref().unwrap_or("?")
                ),
                _ => format!("{:>4}  empty", f.frame_index),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_processes(&self) -> String {
        let procs = self.manager.processes();
        if procs.is_empty() {
            return "no tracked processes".to_string();
        }
        procs
            .iter()
            .map(|p| {
                format!(
                    "{:>7}  {:<20} {:>8} KB  {:>3}/{} pages resident",
                    p.pid, p.name, p.memory_kb, p.resident_pages, p.pages_needed
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.stop_simulation();
        self.manager.clear_observer();
    }
}

fn describe_fault(ev: &FaultEvent) -> String {
    let evicted = match ev.evicted_page {
        Some(page) => format!(", evicted page {}", page),
        None => String::new(),
    };
    format!(
        "FAULT {}:{} ({}) -> frame {}{} [{:.1}us, #{}]",
        ev.pid,
        ev.page_number,
        ev.process_name,
        ev.frame_index,
        evicted,
        ev.recovery_time_micros,
        ev.cumulative_faults
    )
}
