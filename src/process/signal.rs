use std::io;

use libc::{sighandler_t, signal, SIGINT, SIG_DFL, SIG_ERR, SIG_IGN};

use crate::process::ProcessError;

/// What SIGINT should do in a process.
///
/// The shell itself always ignores it. A foreground child gets the default
/// action back so Ctrl-C can stop it; a background child keeps ignoring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPolicy {
    Ignore,
    Default,
}

impl SignalPolicy {
    pub fn for_job(background: bool) -> Self {
        if background {
            SignalPolicy::Ignore
        } else {
            SignalPolicy::Default
        }
    }

    fn handler(self) -> sighandler_t {
        match self {
            SignalPolicy::Ignore => SIG_IGN,
            SignalPolicy::Default => SIG_DFL,
        }
    }

    /// Installs this disposition for SIGINT in the calling process.
    ///
    /// Only calls `signal(2)`, so it is safe to run between fork and exec.
    pub fn apply(self) -> io::Result<()> {
        let previous = unsafe { signal(SIGINT, self.handler()) };
        if previous == SIG_ERR {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Makes the shell process immune to SIGINT for its whole lifetime.
pub fn ignore_interrupts() -> Result<(), ProcessError> {
    SignalPolicy::Ignore
        .apply()
        .map_err(|e| ProcessError::Signal(e.to_string()))
}
