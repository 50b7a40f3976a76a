use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::debugger::{Component, Logger};
use crate::vm::manager::MemoryManagerHandle;
use crate::{vm_debug, vm_info};

/// Background driver that replays tracked processes' access sequences.
///
/// Each tick picks a process and page, then goes through
/// `MemoryManager::access_page` like any other caller. Stopping is
/// cooperative: the flag is checked between ticks.
pub struct Simulator {
    stop: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
    logger: Logger,
}

impl Simulator {
    /// Spawns the driver using the manager's tick interval and seed.
    pub fn start(manager: MemoryManagerHandle, logger: Logger) -> Self {
        let interval = manager.config().tick_interval;
        let seed = manager.config().seed;
        Self::start_with(manager, interval, seed, logger)
    }

    pub fn start_with(
        manager: MemoryManagerHandle,
        interval: Duration,
        seed: Option<u64>,
        logger: Logger,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let ticks = Arc::new(AtomicU64::new(0));

        let mut rng = match seed {
            // keep the driver's stream apart from the manager's
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };

        let thread_stop = stop.clone();
        let thread_ticks = ticks.clone();
        let thread_logger = logger.clone();

        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Acquire) {
                thread::park_timeout(interval);
                if thread_stop.load(Ordering::Acquire) {
                    break;
                }
                if manager.step(&mut rng).is_some() {
                    thread_ticks.fetch_add(1, Ordering::Relaxed);
                }
            }
            vm_debug!(thread_logger, Component::Simulator, "driver loop exited");
        });

        vm_info!(
            logger,
            Component::Simulator,
            "simulation started, tick every {:?}",
            interval
        );

        Self {
            stop,
            ticks,
            handle: Some(handle),
            logger,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Accesses performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Signals the driver and waits for the in-flight tick to finish.
    /// Returns the number of accesses performed.
    pub fn stop(&mut self) -> u64 {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                crate::vm_error!(self.logger, Component::Simulator, "driver thread panicked");
            }
            vm_info!(
                self.logger,
                Component::Simulator,
                "simulation stopped after {} accesses",
                self.ticks()
            );
        }
        self.ticks()
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
    }
}
