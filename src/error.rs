use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid Excel file: {path} ({details})")]
    InvalidExcel { path: PathBuf, details: String },

    #[error("failed to read macros from {path} ({details})")]
    InvalidMacros { path: PathBuf, details: String },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid cell address: row = {row}, column = {column} (both must be >= 0)")]
    InvalidAddress { row: i64, column: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::FileNotFound(_) => 1,
            Error::InvalidExcel { .. } => 2,
            Error::InvalidMacros { .. } => 2,
            Error::UnsupportedFormat(_) => 3,
            Error::InvalidAddress { .. } => 4,
            Error::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
