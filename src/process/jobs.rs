use std::fmt;
use std::io::{self, Write};

use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::Pid;

use super::{CompletionCode, ProcessError};

/// Background children that have been spawned and not yet reaped, oldest first.
#[derive(Debug, Default)]
pub struct JobTable {
    pids: Vec<u32>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pid` at the tail. A pid that is already tracked is not added
    /// twice.
    pub fn push(&mut self, pid: u32) {
        if self.contains(pid) {
            warn!("pid {} is already tracked as a background job", pid);
            return;
        }
        self.pids.push(pid);
    }

    /// Removes the first entry equal to `pid`, keeping the order of the rest.
    pub fn remove(&mut self, pid: u32) -> bool {
        match self.pids.iter().position(|&p| p == pid) {
            Some(index) => {
                self.pids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    pub fn pids(&self) -> &[u32] {
        &self.pids
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// Sends SIGKILL to every tracked job, announcing each one on `out`.
    ///
    /// Every job is signalled even if writing a notice fails; the first write
    /// error is returned afterwards.
    pub fn kill_all<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let mut result = Ok(());
        for pid in self.pids.drain(..) {
            if result.is_ok() {
                result = writeln!(out, "killing process: {}", pid);
            }
            match kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                Ok(()) => debug!("sent SIGKILL to {}", pid),
                Err(errno) => warn!("kill({}) failed: {}", pid, errno),
            }
        }
        result
    }
}

/// A child collected by the reaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub pid: u32,
    pub code: CompletionCode,
}

impl fmt::Display for Reaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background pid {} is done: {}", self.pid, self.code)
    }
}

/// Source of finished children. Must never block.
pub trait ChildWaiter {
    fn poll_any(&mut self) -> Result<Option<Reaped>, ProcessError>;
}

/// `waitpid(-1, WNOHANG)` on the real process table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWaiter;

impl ChildWaiter for SystemWaiter {
    fn poll_any(&mut self) -> Result<Option<Reaped>, ProcessError> {
        match waitpid(None, Some(WaitPidFlag::WNOHANG)) {
            Ok(status) => Ok(status.pid().zip(CompletionCode::from_wait_status(status)).map(
                |(pid, code)| Reaped {
                    pid: pid.as_raw() as u32,
                    code,
                },
            )),
            // no children at all
            Err(Errno::ECHILD) => Ok(None),
            Err(errno) => Err(ProcessError::Reap(errno)),
        }
    }
}

/// Collects at most one finished background child per poll.
#[derive(Debug, Default)]
pub struct Reaper<W: ChildWaiter = SystemWaiter> {
    waiter: W,
}

impl<W: ChildWaiter> Reaper<W> {
    pub fn new(waiter: W) -> Self {
        Self { waiter }
    }

    pub fn poll(&mut self, jobs: &mut JobTable) -> Result<Option<Reaped>, ProcessError> {
        let Some(reaped) = self.waiter.poll_any()? else {
            return Ok(None);
        };

        if jobs.remove(reaped.pid) {
            debug!("reaped background job {} ({})", reaped.pid, reaped.code);
        } else {
            debug!("reaped untracked child {} ({})", reaped.pid, reaped.code);
        }
        Ok(Some(reaped))
    }
}

/// Hands out a fixed sequence of completions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedWaiter {
    script: std::collections::VecDeque<Reaped>,
}

#[cfg(test)]
impl ScriptedWaiter {
    pub(crate) fn new(script: impl IntoIterator<Item = Reaped>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl ChildWaiter for ScriptedWaiter {
    fn poll_any(&mut self) -> Result<Option<Reaped>, ProcessError> {
        Ok(self.script.pop_front())
    }
}
