use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use log::debug;

use super::{CompletionCode, JobTable, ProcessError, SignalPolicy};
use crate::core::parser::Redirections;

/// What became of a launched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A foreground child ran to completion.
    Finished(CompletionCode),
    /// A background child was started and recorded in the job table.
    Background(u32),
}

/// Spawns external programs, one child per command.
#[derive(Debug, Default, Clone)]
pub struct Launcher;

impl Launcher {
    pub fn new() -> Self {
        Self
    }

    /// Runs `command` with the given stream bindings.
    ///
    /// A command with any redirection always runs in the foreground. Files
    /// opened for the bindings are owned by the spawned `Command` and closed
    /// when this returns, whatever the outcome.
    pub fn launch<W: Write>(
        &self,
        command: &[String],
        redirections: &Redirections,
        background: bool,
        jobs: &mut JobTable,
        out: &mut W,
    ) -> Result<LaunchOutcome, ProcessError> {
        let Some((program, args)) = command.split_first() else {
            return Ok(LaunchOutcome::Finished(CompletionCode::SUCCESS));
        };

        let background = background && redirections.is_empty();
        let policy = SignalPolicy::for_job(background);
        let opened = redirections.open()?;

        let mut process = Command::new(program);
        process.args(args);
        if let Some(file) = opened.stdin {
            process.stdin(Stdio::from(file));
        }
        if let Some(file) = opened.stdout {
            process.stdout(Stdio::from(file));
        }
        unsafe {
            process.pre_exec(move || policy.apply());
        }

        out.flush()?;
        let spawned = process.spawn();
        drop(process);
        let mut child = spawned.map_err(|source| classify_spawn_error(program, source))?;

        let pid = child.id();
        debug!("spawned {} as pid {} ({:?})", program, pid, policy);

        if background {
            jobs.push(pid);
            writeln!(out, "background pid is {}", pid)?;
            return Ok(LaunchOutcome::Background(pid));
        }

        let status = child
            .wait()
            .map_err(|source| ProcessError::Wait { pid, source })?;
        let code = CompletionCode::from(status);
        debug!("pid {} finished: {}", pid, code);
        Ok(LaunchOutcome::Finished(code))
    }
}

/// Separates "the program could not be run" from "no process could be
/// created".
fn classify_spawn_error(program: &str, source: io::Error) -> ProcessError {
    match source.kind() {
        io::ErrorKind::NotFound => ProcessError::CommandNotFound(program.to_string()),
        io::ErrorKind::PermissionDenied => ProcessError::Exec {
            program: program.to_string(),
            source,
        },
        _ if source.raw_os_error() == Some(libc::ENOEXEC) => ProcessError::Exec {
            program: program.to_string(),
            source,
        },
        _ => ProcessError::Spawn {
            program: program.to_string(),
            source,
        },
    }
}
