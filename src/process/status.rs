use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::sys::wait::WaitStatus;

/// How a process finished: a normal exit code, or the signal that killed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCode {
    Exited(i32),
    Signaled(i32),
}

impl CompletionCode {
    pub const SUCCESS: CompletionCode = CompletionCode::Exited(0);
    pub const FAILURE: CompletionCode = CompletionCode::Exited(1);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Decodes a raw `wait(2)` status word.
    #[cfg(test)]
    pub fn from_raw(raw: i32) -> Self {
        ExitStatus::from_raw(raw).into()
    }

    /// Maps a `waitpid` result to a completion code. Stops, continues and
    /// "still alive" carry no completion and map to `None`.
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(CompletionCode::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => Some(CompletionCode::Signaled(signal as i32)),
            _ => None,
        }
    }
}

impl Default for CompletionCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitStatus> for CompletionCode {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => CompletionCode::Exited(code),
            (None, Some(signal)) => CompletionCode::Signaled(signal),
            // stopped or continued; treat as still successful so far
            (None, None) => CompletionCode::SUCCESS,
        }
    }
}

impl fmt::Display for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionCode::Exited(code) => write!(f, "exit value {}", code),
            CompletionCode::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}
