use std::io;

use crate::core::commands::Flow;

pub(crate) trait CommandHandler {
    fn execute_line(&mut self, line: &str) -> Flow;
}

impl CommandHandler for super::Shell {
    fn execute_line(&mut self, line: &str) -> Flow {
        let result = {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            self.session.dispatch(line, &mut out)
        };
        match result {
            Ok(flow) => flow,
            Err(e) => {
                self.highlighter.report(&e);
                Flow::Continue
            }
        }
    }
}
