use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use pagesim::config::VmConfig;
use pagesim::debugger::{Component, Logger, StderrSink};
use pagesim::process::ProcfsSource;
use pagesim::shell::{Flow, Shell};
use pagesim::vm::MemoryManager;
use pagesim::vm_info;

fn main() -> Result<()> {
    let config = VmConfig::from_args(std::env::args().skip(1))?;
    let logger: Logger = Arc::new(StderrSink::new(config.debug_level));

    let manager = Arc::new(MemoryManager::new(config.clone(), logger.clone())?);
    let source = ProcfsSource::default().with_logger(logger.clone());
    let mut shell = Shell::new(manager, Box::new(source), logger.clone());

    println!("Paging simulator");
    println!(
        "{} frames, {}KB pages, {} replacement. Type 'help' for commands, Ctrl+D to exit",
        config.frame_count, config.page_size_kb, config.policy
    );

    let mut rl = DefaultEditor::new()?;

    loop {
        let line = match rl.readline("vm> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        rl.add_history_entry(input)?;

        match shell.run_line(input) {
            Ok(Flow::Continue(out)) => {
                if !out.is_empty() {
                    println!("{out}");
                }
            }
            Ok(Flow::Quit) => break,
            Err(error) => println!("error: {error}"),
        }
    }

    vm_info!(logger, Component::Shell, "shutting down");
    Ok(())
}
