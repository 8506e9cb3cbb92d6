use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("unable to find {}", .0.display())]
    MissingFile(PathBuf),

    #[error("package directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("key file not found: {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("cannot derive a package name from '{}'", .0.display())]
    InvalidPackageName(PathBuf),

    #[error("invalid digest '{0}' (expected 1 for SHA-1 or 256 for SHA-256)")]
    InvalidDigest(String),

    #[error("missing required value: {0}")]
    MissingInput(&'static str),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("malformed package: {0}")]
    MalformedPackage(String),

    #[error("signature verification failed for {}", .0.display())]
    VerificationFailed(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        Error::Custom(msg.into())
    }
}
