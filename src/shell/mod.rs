use std::io;
use std::path::Path;

use log::{debug, info};
use rustyline::{config::Configurer, error::ReadlineError, DefaultEditor};

mod executor;
mod session;

use crate::{
    core::{commands::Flow, config::Config, parser::ParseError},
    error::ShellError,
    flags::Flags,
    highlight::SyntaxHighlighter,
    process::signal,
};

use executor::CommandHandler;
use session::Session;

const BANNER: &str = "minsh waiting for command...";

pub struct Shell {
    pub(crate) editor: DefaultEditor,
    pub(crate) config: Config,
    pub(crate) flags: Flags,
    pub(crate) session: Session,
    pub(crate) highlighter: SyntaxHighlighter,
}

/// What a failed read means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadFailure {
    /// Ctrl-C at the prompt.
    Interrupted,
    /// The line was not valid UTF-8. Only that line is lost.
    Undecodable,
    EndOfInput,
    Fatal,
}

impl ReadFailure {
    fn of(error: &ReadlineError) -> Self {
        match error {
            ReadlineError::Interrupted => ReadFailure::Interrupted,
            ReadlineError::Eof => ReadFailure::EndOfInput,
            ReadlineError::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
                ReadFailure::Undecodable
            }
            _ => ReadFailure::Fatal,
        }
    }
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let config = Config::load(flags.get_value("config").map(Path::new))?;
        for (name, _) in config.exported() {
            debug!("rc file exported {}", name);
        }

        // Ctrl-C must only ever reach foreground children
        signal::ignore_interrupts()?;

        let mut editor = DefaultEditor::new()?;
        editor.set_auto_add_history(true);

        Ok(Shell {
            editor,
            config,
            flags,
            session: Session::new(),
            highlighter: SyntaxHighlighter::new(),
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        if !self.flags.is_set("quiet") {
            println!("{}", self.highlighter.highlight_hint(BANNER));
        }

        loop {
            self.reap_finished();

            let error = match self.editor.readline(self.config.prompt()) {
                Ok(line) => {
                    if self.execute_line(&line) == Flow::Exit {
                        break;
                    }
                    continue;
                }
                Err(e) => e,
            };

            match ReadFailure::of(&error) {
                ReadFailure::Interrupted => continue,
                ReadFailure::Undecodable => {
                    debug!("dropping line: {}", error);
                    let rejected = self.session.reject(ParseError::InvalidEncoding);
                    self.highlighter.report(&rejected);
                }
                ReadFailure::EndOfInput => {
                    debug!("end of input");
                    self.terminate();
                    break;
                }
                ReadFailure::Fatal => {
                    self.terminate();
                    return Err(error.into());
                }
            }
        }

        info!("session finished");
        Ok(())
    }

    fn reap_finished(&mut self) {
        let stdout = io::stdout();
        let result = self.session.reap_finished(&mut stdout.lock());
        if let Err(e) = result {
            self.highlighter.report(&e);
        }
    }

    fn terminate(&mut self) {
        let stdout = io::stdout();
        self.session.terminate(&mut stdout.lock());
    }
}
