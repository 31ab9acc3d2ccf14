pub mod executor;
pub mod jobs;
pub mod signal;
pub mod status;

pub use executor::{LaunchOutcome, Launcher};
pub use jobs::{ChildWaiter, JobTable, Reaped, Reaper, SystemWaiter};
#[cfg(test)]
pub(crate) use jobs::ScriptedWaiter;
pub use signal::SignalPolicy;
pub use status::CompletionCode;

use crate::core::parser::RedirectError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{0}: no such file or directory")]
    CommandNotFound(String),
    #[error("{program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Redirect(#[from] RedirectError),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for pid {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to poll background jobs: {0}")]
    Reap(#[source] nix::errno::Errno),
    #[error("signal error: {0}")]
    Signal(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    /// The completion code a failure stands for, when it takes the place of
    /// a child that would have exited with status 1. Failures where no child
    /// could be created at all leave the session state untouched.
    pub fn completion(&self) -> Option<CompletionCode> {
        match self {
            ProcessError::CommandNotFound(_)
            | ProcessError::Exec { .. }
            | ProcessError::Redirect(_) => Some(CompletionCode::FAILURE),
            _ => None,
        }
    }
}
