use crate::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Message digest used for the detached package signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digest {
    Sha1,
    Sha256,
}

impl Digest {
    pub const ALL: [Digest; 2] = [Digest::Sha1, Digest::Sha256];

    /// Argument passed to `openssl dgst`
    pub fn openssl_flag(&self) -> &'static str {
        match self {
            Digest::Sha1 => "-sha1",
            Digest::Sha256 => "-sha256",
        }
    }

    /// Extension appended to the inner tarball name for the signature file
    pub fn extension(&self) -> &'static str {
        match self {
            Digest::Sha1 => "sha1",
            Digest::Sha256 => "sha256",
        }
    }

    /// Infer the digest from a signature file name (`*.sha1` / `*.sha256`)
    pub fn from_signature_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|d| d.extension() == ext)
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "sha1" | "sha-1" => Ok(Digest::Sha1),
            "256" | "sha256" | "sha-256" => Ok(Digest::Sha256),
            _ => Err(Error::InvalidDigest(s.to_string())),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Digest::Sha1 => write!(f, "SHA-1"),
            Digest::Sha256 => write!(f, "SHA-256"),
        }
    }
}
