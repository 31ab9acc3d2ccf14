use super::{Command, CommandError, Context, Flow};
use crate::process::CompletionCode;

/// `exit`: kills every background job, then ends the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        ctx.jobs.kill_all(&mut ctx.out)?;
        writeln!(ctx.out, "Quit!")?;
        Ok(Flow::Exit)
    }
}

/// `status`: prints how the last command finished, then clears it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCommand;

impl Command for StatusCommand {
    fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        writeln!(ctx.out, "{}", ctx.state.last_completion())?;
        ctx.state.record(CompletionCode::SUCCESS);
        Ok(Flow::Continue)
    }
}
