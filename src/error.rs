//! Error types for the command-line front-end.
//!
//! Each kind carries the message of the failure it wraps, so the one-line
//! report already says what went wrong and (for sessions) in which scenario.
//! The full [`exn`] tree is printed with `-v`.

use derive_more::{Display, Error};
use exn::ResultExt;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration: {_0}")]
    Config(#[error(not(source))] String),
    #[display("history: {_0}")]
    History(#[error(not(source))] String),
    #[display("{_0}")]
    Import(#[error(not(source))] String),
    #[display("no source root selected; pass --source-root")]
    NoSourceRoot,
}

/// Wraps a lower-level error, keeping its message at the top of the report.
pub fn wrap<T, E>(result: std::result::Result<T, exn::Exn<E>>, kind: impl FnOnce(String) -> ErrorKind) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let message = (*err).to_string();
            Err(err).or_raise(|| kind(message))
        },
    }
}
