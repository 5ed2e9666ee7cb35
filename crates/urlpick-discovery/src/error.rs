use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read profile data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode profile data: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
