pub mod error;
pub mod flags;
pub mod highlight;
pub mod shell;

pub mod core;
pub mod process;
