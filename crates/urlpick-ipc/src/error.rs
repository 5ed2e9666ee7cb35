use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Another instance already serves {}", .0.display())]
    AlreadyBound(PathBuf),

    #[error("Service binary not found at {}", .0.display())]
    ServiceBinaryNotFound(PathBuf),

    #[error("Timed out connecting to service socket {}", .0.display())]
    ConnectTimeout(PathBuf),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
