use std::env;
use std::path::PathBuf;

use log::debug;

use super::{Command, CommandError, Context, Flow};
use crate::process::CompletionCode;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CdCommand;

impl CdCommand {
    fn home_dir() -> Result<PathBuf, CommandError> {
        env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(CommandError::HomeDirNotFound)
    }

    fn change_to(&self, args: &[String], ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let target = match args.get(1) {
            Some(path) => PathBuf::from(path),
            None => {
                writeln!(ctx.out, "Changing to home directory...")?;
                Self::home_dir()?
            }
        };

        env::set_current_dir(&target).map_err(|e| {
            debug!("chdir({}) failed: {}", target.display(), e);
            CommandError::DirectoryNotFound(target.display().to_string())
        })
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        match self.change_to(args, ctx) {
            Ok(()) => {
                ctx.state.record(CompletionCode::SUCCESS);
                Ok(Flow::Continue)
            }
            Err(e) => {
                ctx.state.record(CompletionCode::FAILURE);
                Err(e)
            }
        }
    }
}
