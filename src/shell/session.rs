use std::io::Write;

use log::{debug, warn};

use crate::core::commands::{Builtin, Command, Context, ExitCommand, Flow};
use crate::core::parser::{tokenize, ParseError, Redirections};
use crate::core::state::ShellState;
use crate::error::ShellError;
use crate::process::{
    ChildWaiter, CompletionCode, JobTable, LaunchOutcome, Launcher, ProcessError, Reaped, Reaper,
    SystemWaiter,
};

/// Everything one line of input can change: the last completion code and the
/// background jobs. Output goes to whatever writer the caller hands in.
#[derive(Debug)]
pub(crate) struct Session<W: ChildWaiter = SystemWaiter> {
    state: ShellState,
    jobs: JobTable,
    reaper: Reaper<W>,
    launcher: Launcher,
}

impl Session {
    pub fn new() -> Self {
        Self::with_waiter(SystemWaiter)
    }
}

impl<W: ChildWaiter> Session<W> {
    pub fn with_waiter(waiter: W) -> Self {
        Self {
            state: ShellState::new(),
            jobs: JobTable::new(),
            reaper: Reaper::new(waiter),
            launcher: Launcher::new(),
        }
    }

    /// Runs one input line. Every error is local to this line; the caller
    /// only reports it.
    pub fn dispatch<O: Write>(&mut self, line: &str, out: &mut O) -> Result<Flow, ShellError> {
        let args = tokenize(line).inspect_err(|_| self.state.record(CompletionCode::FAILURE))?;

        if let Some(builtin) = Builtin::resolve(&args) {
            debug!("built-in {:?}", builtin);
            let mut ctx = Context {
                state: &mut self.state,
                jobs: &mut self.jobs,
                out: &mut *out,
            };
            return match builtin.execute(args.args(), &mut ctx) {
                Ok(flow) => Ok(flow),
                // a failed notice must not keep the shell alive
                Err(e) if matches!(builtin, Builtin::Exit(_)) => {
                    warn!("exit: {}", e);
                    Ok(Flow::Exit)
                }
                Err(e) => Err(e.into()),
            };
        }

        let (command, redirections) = Redirections::resolve(args.args())
            .inspect_err(|_| self.state.record(CompletionCode::FAILURE))?;

        let outcome = self.launcher.launch(
            &command,
            &redirections,
            args.is_background(),
            &mut self.jobs,
            out,
        );
        self.settle(outcome)
    }

    fn settle(&mut self, outcome: Result<LaunchOutcome, ProcessError>) -> Result<Flow, ShellError> {
        match outcome {
            Ok(LaunchOutcome::Finished(code)) => self.state.record(code),
            Ok(LaunchOutcome::Background(pid)) => debug!("job {} running in background", pid),
            Err(e) => {
                if let Some(code) = e.completion() {
                    self.state.record(code);
                }
                return Err(e.into());
            }
        }
        Ok(Flow::Continue)
    }

    /// Drops a line that never reached the tokenizer. It counts as a failed
    /// command.
    pub fn reject(&mut self, error: ParseError) -> ShellError {
        self.state.record(CompletionCode::FAILURE);
        error.into()
    }

    /// One non-blocking look for a finished background job. A job that is
    /// found is announced on `out` and becomes the last completion.
    pub fn reap_finished<O: Write>(&mut self, out: &mut O) -> Result<Option<Reaped>, ShellError> {
        let Some(reaped) = self.reaper.poll(&mut self.jobs)? else {
            return Ok(None);
        };
        self.state.record(reaped.code);
        writeln!(out, "{}", reaped)?;
        Ok(Some(reaped))
    }

    /// Same as the `exit` built-in.
    pub fn terminate<O: Write>(&mut self, out: &mut O) {
        let mut ctx = Context {
            state: &mut self.state,
            jobs: &mut self.jobs,
            out: &mut *out,
        };
        if let Err(e) = ExitCommand.execute(&[], &mut ctx) {
            warn!("exit: {}", e);
        }
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::MAX_LINE_LEN;
    use crate::process::ScriptedWaiter;
    use nix::sys::wait::waitpid;
    use nix::unistd::Pid;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::io;

    fn session(script: Vec<Reaped>) -> Session<ScriptedWaiter> {
        Session::with_waiter(ScriptedWaiter::new(script))
    }

    fn run<W: ChildWaiter>(session: &mut Session<W>, line: &str) -> (Result<Flow, ShellError>, String) {
        let mut out = Vec::new();
        let result = session.dispatch(line, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_long_line_fails_the_command() {
        let mut session = session(vec![]);
        session.state.record(CompletionCode::Exited(4));

        let (result, out) = run(&mut session, &"a".repeat(MAX_LINE_LEN + 1));
        assert!(matches!(
            result,
            Err(ShellError::Parse(ParseError::LineTooLong(_)))
        ));
        assert!(out.is_empty());
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);

        let (_, out) = run(&mut session, "status");
        assert_eq!(out, "exit value 1\n");
    }

    #[test]
    fn test_too_many_arguments_fails_the_command() {
        let mut session = session(vec![]);
        let line = vec!["x"; 600].join(" ");

        let (result, _) = run(&mut session, &line);
        let err = result.unwrap_err();
        assert!(matches!(err, ShellError::Parse(ParseError::TooManyArguments(600))));
        assert_eq!(err.to_string(), "That is too many arguments!");
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);
    }

    #[test]
    fn test_bad_redirection_fails_the_command() {
        let mut session = session(vec![]);

        let (result, _) = run(&mut session, "> out.txt");
        assert!(matches!(
            result,
            Err(ShellError::Parse(ParseError::LeadingOperator(_)))
        ));
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);

        session.state.record(CompletionCode::SUCCESS);
        let (result, _) = run(&mut session, "cat <");
        assert!(matches!(
            result,
            Err(ShellError::Parse(ParseError::MissingTarget(_)))
        ));
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);
        assert!(session.jobs.is_empty());
    }

    #[test]
    fn test_empty_line_resets_status() {
        let mut session = session(vec![]);
        session.state.record(CompletionCode::Exited(2));

        let (result, out) = run(&mut session, "   # nothing to do");
        assert_eq!(result.unwrap(), Flow::Continue);
        assert!(out.is_empty());
        assert_eq!(session.state.last_completion(), CompletionCode::SUCCESS);
    }

    #[test]
    fn test_spawn_failure_keeps_last_status() {
        let mut session = session(vec![]);
        session.state.record(CompletionCode::Exited(3));

        let err = session
            .settle(Err(ProcessError::Spawn {
                program: "ls".to_string(),
                source: io::Error::from_raw_os_error(libc::EAGAIN),
            }))
            .unwrap_err();
        assert!(matches!(err, ShellError::Process(ProcessError::Spawn { .. })));
        assert_eq!(session.state.last_completion(), CompletionCode::Exited(3));

        let err = session
            .settle(Err(ProcessError::CommandNotFound("nope".to_string())))
            .unwrap_err();
        assert_eq!(err.to_string(), "nope: no such file or directory");
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);
    }

    #[test]
    fn test_background_launch_keeps_last_status() {
        let mut session = session(vec![]);
        session.state.record(CompletionCode::Exited(6));

        let flow = session
            .settle(Ok(LaunchOutcome::Background(4242)))
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.state.last_completion(), CompletionCode::Exited(6));
    }

    #[test]
    #[serial]
    fn test_missing_program_through_dispatch() {
        let mut session = session(vec![]);

        let (result, out) = run(&mut session, "minsh-no-such-program --flag");
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "minsh-no-such-program: no such file or directory");
        assert!(out.is_empty());
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);
    }

    #[test]
    #[serial]
    fn test_foreground_status_round_trip() {
        let script = env::temp_dir().join(format!("minsh_session_exit_{}", std::process::id()));
        fs::write(&script, "exit 3\n").unwrap();
        let mut session = session(vec![]);

        let (result, out) = run(&mut session, &format!("sh {}", script.display()));
        assert_eq!(result.unwrap(), Flow::Continue);
        assert!(out.is_empty());
        assert_eq!(session.state.last_completion(), CompletionCode::Exited(3));

        let (_, out) = run(&mut session, "status");
        assert_eq!(out, "exit value 3\n");
        let (_, out) = run(&mut session, "status");
        assert_eq!(out, "exit value 0\n");

        let _ = fs::remove_file(script);
    }

    #[test]
    fn test_reaped_job_becomes_last_status() {
        let mut session = session(vec![Reaped {
            pid: 42,
            code: CompletionCode::Signaled(15),
        }]);
        session.jobs.push(42);

        let mut out = Vec::new();
        let reaped = session.reap_finished(&mut out).unwrap();
        assert_eq!(reaped.map(|r| r.pid), Some(42));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "background pid 42 is done: terminated by signal 15\n"
        );
        assert!(session.jobs.is_empty());

        let (_, out) = run(&mut session, "status");
        assert_eq!(out, "terminated by signal 15\n");
    }

    #[test]
    fn test_idle_reap_leaves_status_alone() {
        let mut session = session(vec![]);
        session.state.record(CompletionCode::Exited(5));

        let mut out = Vec::new();
        assert_eq!(session.reap_finished(&mut out).unwrap(), None);
        assert!(out.is_empty());
        assert_eq!(session.state.last_completion(), CompletionCode::Exited(5));
    }

    #[test]
    fn test_rejected_line_counts_as_failure() {
        let mut session = session(vec![]);

        let err = session.reject(ParseError::InvalidEncoding);
        assert_eq!(err.to_string(), "That command is not valid UTF-8!");
        assert_eq!(session.state.last_completion(), CompletionCode::FAILURE);

        let (result, out) = run(&mut session, "status");
        assert_eq!(result.unwrap(), Flow::Continue);
        assert_eq!(out, "exit value 1\n");
    }

    #[test]
    fn test_exit_ends_the_session() {
        let mut session = session(vec![]);
        let (result, out) = run(&mut session, "exit");
        assert_eq!(result.unwrap(), Flow::Exit);
        assert_eq!(out, "Quit!\n");
    }

    #[test]
    #[serial]
    fn test_terminate_kills_background_jobs() {
        let mut session = session(vec![]);

        let (result, out) = run(&mut session, "sleep 30 &");
        assert_eq!(result.unwrap(), Flow::Continue);
        let pid = session.jobs.pids()[0];
        assert_eq!(out, format!("background pid is {}\n", pid));

        let mut out = Vec::new();
        session.terminate(&mut out);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("killing process: {}\nQuit!\n", pid)
        );
        assert!(session.jobs.is_empty());

        let status = waitpid(Pid::from_raw(pid as i32), None).unwrap();
        assert_eq!(CompletionCode::from_wait_status(status), Some(CompletionCode::Signaled(9)));
    }
}
