use std::io::{self, IsTerminal};

use inksac::prelude::*;

use crate::error::ShellError;

/// Where a rendered message belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    stdout_color: bool,
    stderr_color: bool,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Colors a stream only when the terminal supports it and the stream is
    /// a terminal.
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        let supported = !matches!(support, ColorSupport::NoColor);
        Self {
            stdout_color: supported && io::stdout().is_terminal(),
            stderr_color: supported && io::stderr().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            stdout_color: false,
            stderr_color: false,
        }
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.stderr_color {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if !self.stdout_color {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();
        hint.style(hint_style).to_string()
    }

    /// Notices about the typed line are plain command output; anything else
    /// is a diagnostic for stderr.
    pub fn render(&self, error: &ShellError) -> (Channel, String) {
        if error.is_notice() {
            (Channel::Stdout, error.to_string())
        } else {
            (Channel::Stderr, self.highlight_error(&error.to_string()))
        }
    }

    pub fn report(&self, error: &ShellError) {
        match self.render(error) {
            (Channel::Stdout, message) => println!("{}", message),
            (Channel::Stderr, message) => eprintln!("{}", message),
        }
    }
}
