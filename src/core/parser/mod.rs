mod redirect;
mod tokenizer;

pub use redirect::{OpenedRedirections, RedirectError, Redirections, Stream};
pub use tokenizer::{tokenize, ArgumentList, MAX_ARGS, MAX_LINE_LEN};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("That command is too long!")]
    LineTooLong(usize),
    #[error("That is too many arguments!")]
    TooManyArguments(usize),
    #[error("That command is not valid UTF-8!")]
    InvalidEncoding,
    #[error("syntax error: `{0}` has no command before it")]
    LeadingOperator(String),
    #[error("syntax error: `{0}` expects a file name")]
    MissingTarget(String),
    #[error("syntax error: more than one {0} redirection")]
    DuplicateRedirection(Stream),
}
