use std::io::{self, Write};

mod builtin;
mod cd;

pub use builtin::{ExitCommand, StatusCommand};
pub use cd::CdCommand;

use crate::core::parser::ArgumentList;
use crate::core::state::ShellState;
use crate::process::{CompletionCode, JobTable};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No directory found with name {0}")]
    DirectoryNotFound(String),
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Whether the main loop keeps going after a built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a built-in may touch.
pub struct Context<'a> {
    pub state: &'a mut ShellState,
    pub jobs: &'a mut JobTable,
    pub out: &'a mut dyn Write,
}

pub trait Command {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError>;
}

/// The commands the shell runs itself, resolved once per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// A line with no words.
    Empty,
    Exit(ExitCommand),
    Status(StatusCommand),
    Cd(CdCommand),
}

impl Builtin {
    /// `None` means the line names an external program.
    pub fn resolve(args: &ArgumentList) -> Option<Self> {
        match args.program() {
            None => Some(Builtin::Empty),
            Some("exit") => Some(Builtin::Exit(ExitCommand)),
            Some("status") => Some(Builtin::Status(StatusCommand)),
            Some("cd") => Some(Builtin::Cd(CdCommand)),
            Some(_) => None,
        }
    }
}

impl Command for Builtin {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        match self {
            Builtin::Empty => {
                ctx.state.record(CompletionCode::SUCCESS);
                Ok(Flow::Continue)
            }
            Builtin::Exit(cmd) => cmd.execute(args, ctx),
            Builtin::Status(cmd) => cmd.execute(args, ctx),
            Builtin::Cd(cmd) => cmd.execute(args, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::tokenize;

    #[test]
    fn test_resolve_builtins() {
        let resolve = |line: &str| Builtin::resolve(&tokenize(line).unwrap());

        assert_eq!(resolve(""), Some(Builtin::Empty));
        assert_eq!(resolve("# nothing"), Some(Builtin::Empty));
        assert_eq!(resolve("exit"), Some(Builtin::Exit(ExitCommand)));
        assert_eq!(resolve("status"), Some(Builtin::Status(StatusCommand)));
        assert_eq!(resolve("cd /tmp"), Some(Builtin::Cd(CdCommand)));
        assert_eq!(resolve("ls -l"), None);
        assert_eq!(resolve("exitt"), None);
        assert_eq!(resolve("echo exit"), None);
    }

    #[test]
    fn test_empty_line_resets_status() {
        let mut state = ShellState::new();
        state.record(CompletionCode::Exited(5));
        let mut jobs = JobTable::new();
        let mut out = Vec::new();
        let mut ctx = Context {
            state: &mut state,
            jobs: &mut jobs,
            out: &mut out,
        };

        let flow = Builtin::Empty.execute(&[], &mut ctx).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert_eq!(state.last_completion(), CompletionCode::SUCCESS);
    }

    #[test]
    fn test_command_error_display() {
        assert_eq!(
            CommandError::DirectoryNotFound("/nope".to_string()).to_string(),
            "No directory found with name /nope"
        );
        assert!(!CommandError::HomeDirNotFound.to_string().is_empty());
    }
}
