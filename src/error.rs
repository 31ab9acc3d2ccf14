use crate::core::commands::CommandError;
use crate::core::config::ConfigError;
use crate::core::parser::ParseError;
use crate::process::ProcessError;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Flag error: {0}")]
    FlagError(String),
}

impl ShellError {
    /// Whether this is feedback about what the user typed, printed like any
    /// other command output, rather than a failure of the shell itself.
    pub fn is_notice(&self) -> bool {
        match self {
            ShellError::Parse(_) => true,
            ShellError::Command(e) => !matches!(e, CommandError::IoError(_)),
            ShellError::Process(e) => e.completion().is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_user_mistakes_are_notices() {
        assert!(ShellError::from(ParseError::LineTooLong(4000)).is_notice());
        assert!(ShellError::from(CommandError::DirectoryNotFound("x".into())).is_notice());
        assert!(ShellError::from(ProcessError::CommandNotFound("x".into())).is_notice());
    }

    #[test]
    fn test_shell_failures_are_not_notices() {
        assert!(!ShellError::from(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")).is_notice());
        assert!(!ShellError::from(CommandError::IoError(io::Error::new(io::ErrorKind::Other, "x"))).is_notice());
        assert!(!ShellError::from(ProcessError::Reap(nix::errno::Errno::EINTR)).is_notice());
    }
}
