use super::ParseError;

/// Longest accepted input line, in characters, not counting the line terminator.
pub const MAX_LINE_LEN: usize = 2048;
/// Most arguments a single command may carry.
pub const MAX_ARGS: usize = 512;

const COMMENT: char = '#';
const BACKGROUND: &str = "&";

/// The words of one input line plus its "run in background" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    args: Vec<String>,
    background: bool,
}

impl ArgumentList {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn is_background(&self) -> bool {
        self.background
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }
}

/// Splits a raw line into an [`ArgumentList`].
///
/// Everything from the first `#` on is a comment. A standalone `&` word marks
/// the command as a background job and ends scanning; whatever follows it is
/// dropped.
pub fn tokenize(line: &str) -> Result<ArgumentList, ParseError> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);

    let length = line.chars().count();
    if length > MAX_LINE_LEN {
        return Err(ParseError::LineTooLong(length));
    }

    let code = match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut list = ArgumentList::default();
    for word in code.split_whitespace() {
        if word == BACKGROUND {
            list.background = true;
            break;
        }
        list.args.push(word.to_owned());
    }

    if list.args.len() > MAX_ARGS {
        return Err(ParseError::TooManyArguments(list.args.len()));
    }

    Ok(list)
}
