use std::str::FromStr;

use crate::common::{PageNumber, Pid};
use crate::shell::errors::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Add {
        pid: Pid,
        name: String,
        memory_kb: u64,
    },
    Track { pid: Pid },
    Find { needle: String },
    Remove { pid: Pid },
    Access { pid: Pid, page: PageNumber },
    Step { count: usize },
    Policy { name: String },
    Frames { count: usize },
    Start,
    Stop,
    Stats,
    Table,
    Resident,
    Processes,
    Log { count: usize },
}

pub const HELP: &str = "\
commands:
  add <pid> <name> <kb>   track a synthetic process
  track <pid>             track a live process
  find <name>             list live processes whose name contains <name>
  remove <pid>            stop tracking a process
  access <pid> <page>     access one page
  step [n]                run n simulation ticks (default 1)
  policy <name>           FIFO, LRU, LFU or Optimal
  frames <n>              resize the frame pool
  start | stop            background simulation
  stats                   counters and rates
  table                   frame table
  resident                pages the policy holds, in its own order
  processes               tracked processes
  log [n]                 last n page faults (default 10)
  help | quit";

struct Args<'a> {
    command: &'static str,
    rest: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn raw(&mut self, argument: &'static str) -> Result<&'a str, CommandError> {
        self.rest.next().ok_or(CommandError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn parse<T: FromStr>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let raw = self.raw(argument)?;
        raw.parse().map_err(|_| CommandError::InvalidArgument {
            command: self.command,
            argument,
            value: raw.to_string(),
        })
    }

    fn parse_or<T: FromStr>(
        &mut self,
        argument: &'static str,
        default: T,
    ) -> Result<T, CommandError> {
        match self.rest.clone().next() {
            Some(_) => self.parse(argument),
            None => Ok(default),
        }
    }

    fn done(mut self, cmd: Command) -> Result<Command, CommandError> {
        match self.rest.next() {
            Some(_) => Err(CommandError::TooManyArguments {
                command: self.command,
            }),
            None => Ok(cmd),
        }
    }
}

/// Parses one shell line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command: &'static str = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => "help",
        "quit" | "exit" => "quit",
        "add" => "add",
        "track" => "track",
        "find" => "find",
        "remove" | "rm" => "remove",
        "access" => "access",
        "step" => "step",
        "policy" => "policy",
        "frames" => "frames",
        "start" => "start",
        "stop" => "stop",
        "stats" => "stats",
        "table" => "table",
        "resident" => "resident",
        "processes" | "ps" => "processes",
        "log" => "log",
        _ => {
            return Err(CommandError::UnknownCommand {
                name: head.to_string(),
            });
        }
    };

    let mut args = Args {
        command,
        rest: words,
    };

    let cmd = match command {
        "help" => Command::Help,
        "quit" => Command::Quit,
        "add" => Command::Add {
            pid: args.parse("pid")?,
            name: args.raw("name")?.to_string(),
            memory_kb: args.parse("kb")?,
        },
        "track" => Command::Track {
            pid: args.parse("pid")?,
        },
        "find" => Command::Find {
            needle: args.raw("name")?.to_string(),
        },
        "remove" => Command::Remove {
            pid: args.parse("pid")?,
        },
        "access" => Command::Access {
            pid: args.parse("pid")?,
            page: args.parse("page")?,
        },
        "step" => Command::Step {
            count: args.parse_or("n", 1)?,
        },
        "policy" => Command::Policy {
            name: args.raw("name")?.to_string(),
        },
        "frames" => Command::Frames {
            count: args.parse("n")?,
        },
        "start" => Command::Start,
        "stop" => Command::Stop,
        "stats" => Command::Stats,
        "table" => Command::Table,
        "resident" => Command::Resident,
        "processes" => Command::Processes,
        _ => Command::Log {
            count: args.parse_or("n", 10)?,
        },
    };

    args.done(cmd).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse_command("add 12 nginx 2048"),
            Ok(Some(Command::Add {
                pid: 12,
                name: "nginx".into(),
                memory_kb: 2048
            }))
        );
        assert_eq!(
            parse_command("ACCESS 3 14"),
            Ok(Some(Command::Access { pid: 3, page: 14 }))
        );
        assert_eq!(parse_command("ps"), Ok(Some(Command::Processes)));
        assert_eq!(parse_command("resident"), Ok(Some(Command::Resident)));
    }

    #[test]
    fn optional_counts_default() {
        assert_eq!(parse_command("step"), Ok(Some(Command::Step { count: 1 })));
        assert_eq!(parse_command("step 25"), Ok(Some(Command::Step { count: 25 })));
        assert_eq!(parse_command("log"), Ok(Some(Command::Log { count: 10 })));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            parse_command("swap 1"),
            Err(CommandError::UnknownCommand {
                name: "swap".into()
            })
        );
        assert_eq!(
            parse_command("frames"),
            Err(CommandError::MissingArgument {
                command: "frames",
                argument: "n"
            })
        );
        assert_eq!(
            parse_command("remove abc"),
            Err(CommandError::InvalidArgument {
                command: "remove",
                argument: "pid",
                value: "abc".into()
            })
        );
        assert_eq!(
            parse_command("stats now"),
            Err(CommandError::TooManyArguments { command: "stats" })
        );
    }
}
