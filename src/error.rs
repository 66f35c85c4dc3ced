use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharpcovError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed trace line {position}: expected at least 7 tab-separated fields, got: {line:?}")]
    MalformedLine { line: String, position: usize },

    #[error("invalid line number on trace line {position}: {line:?}")]
    InvalidLineNumber { line: String, position: usize },
}

pub type Result<T> = std::result::Result<T, SharpcovError>;
