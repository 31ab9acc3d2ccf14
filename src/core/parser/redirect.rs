use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use super::ParseError;

const OUTPUT_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Input,
    Output,
}

impl Stream {
    fn from_operator(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Stream::Input),
            ">" => Some(Stream::Output),
            _ => None,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Input => write!(f, "input"),
            Stream::Output => write!(f, "output"),
        }
    }
}

/// A redirection target that could not be opened. Fatal for the command it
/// belongs to, never for the shell.
#[derive(Debug, thiserror::Error)]
#[error("minsh: cannot open {} for {stream}", path.display())]
pub struct RedirectError {
    pub stream: Stream,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The stream bindings requested by one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

/// Files opened for a single spawn. Dropping this closes them.
#[derive(Debug, Default)]
pub struct OpenedRedirections {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
}

impl Redirections {
    /// Pulls `<` / `>` operators and their targets out of `args`.
    ///
    /// Returns the remaining command words, in order, together with the
    /// bindings. The command keeps every word that is not an operator or an
    /// operator's target.
    pub fn resolve(args: &[String]) -> Result<(Vec<String>, Redirections), ParseError> {
        let mut command = Vec::with_capacity(args.len());
        let mut redirections = Redirections::default();
        let mut tokens = args.iter();

        while let Some(token) = tokens.next() {
            let Some(stream) = Stream::from_operator(token) else {
                command.push(token.clone());
                continue;
            };

            if command.is_empty() {
                return Err(ParseError::LeadingOperator(token.clone()));
            }

            let target = match tokens.next() {
                Some(path) if Stream::from_operator(path).is_none() => PathBuf::from(path),
                _ => return Err(ParseError::MissingTarget(token.clone())),
            };

            let slot = match stream {
                Stream::Input => &mut redirections.input,
                Stream::Output => &mut redirections.output,
            };
            if slot.is_some() {
                return Err(ParseError::DuplicateRedirection(stream));
            }
            *slot = Some(target);
        }

        Ok((command, redirections))
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Opens every bound path: input read-only, output write/create/truncate
    /// with mode 0644.
    pub fn open(&self) -> Result<OpenedRedirections, RedirectError> {
        let mut opened = OpenedRedirections::default();

        if let Some(path) = &self.input {
            let file = File::open(path).map_err(|source| RedirectError {
                stream: Stream::Input,
                path: path.clone(),
                source,
            })?;
            opened.stdin = Some(file);
        }

        if let Some(path) = &self.output {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(OUTPUT_MODE)
                .open(path)
                .map_err(|source| RedirectError {
                    stream: Stream::Output,
                    path: path.clone(),
                    source,
                })?;
            opened.stdout = Some(file);
        }

        Ok(opened)
    }
}
