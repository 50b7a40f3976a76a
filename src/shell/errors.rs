use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand {
        name: String,
    },
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
    TooManyArguments {
        command: &'static str,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand { name } => {
                write!(f, "unknown command '{}' (try 'help')", name)
            }
            CommandError::MissingArgument { command, argument } => {
                write!(f, "{}: missing <{}>", command, argument)
            }
            CommandError::InvalidArgument {
                command,
                argument,
                value,
            } => write!(f, "{}: invalid <{}> '{}'", command, argument, value),
            CommandError::TooManyArguments { command } => {
                write!(f, "{}: too many arguments", command)
            }
        }
    }
}

impl std::error::Error for CommandError {}
