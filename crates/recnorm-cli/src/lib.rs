//! Library components of the `recnorm` command-line tool.

pub mod logging;
pub mod records;
