pub mod config;
pub mod error;

pub mod common;
pub mod debugger;
pub mod policy;
pub mod process;
pub mod shell;
pub mod vm;
