//! Errors surfaced by the command line tool
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Loading the input or writing the output copy failed
    #[error(transparent)]
    Core(#[from] scafview_core::Error),

    /// Terminal or console output failed
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
