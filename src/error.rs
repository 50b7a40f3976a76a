use crate::{config::ConfigError, policy::errors::PolicyError};

#[derive(Debug)]
pub enum VmError {
    Config(ConfigError),
    Policy(PolicyError),
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VmError::Config(e) => write!(f, "{e}"),
            VmError::Policy(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for VmError {}

impl From<ConfigError> for VmError {
    fn from(e: ConfigError) -> Self {
        VmError::Config(e)
    }
}

impl From<PolicyError> for VmError {
    fn from(e: PolicyError) -> Self {
        VmError::Policy(e)
    }
}

pub type VmResult<T> = Result<T, VmError>;
