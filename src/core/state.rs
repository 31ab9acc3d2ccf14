use crate::process::CompletionCode;

/// Per-session bookkeeping. The working directory lives in the OS.
#[derive(Debug, Default)]
pub struct ShellState {
    last: CompletionCode,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_completion(&self) -> CompletionCode {
        self.last
    }

    pub fn record(&mut self, code: CompletionCode) {
        self.last = code;
    }
}
