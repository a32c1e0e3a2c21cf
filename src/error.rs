use std::io;

use thiserror::Error;

/// Failure talking to the question-bank service.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Top-level error for running a page.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Bank(#[from] BankError),
}
