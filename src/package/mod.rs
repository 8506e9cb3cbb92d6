pub mod archive;
pub mod sign;
pub mod verify;

use crate::context::Context;
use crate::digest::Digest;
use crate::result::Result;
use crate::utils;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Archive,
    Sign,
    Bundle,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Archive => write!(f, "Compressing package directory"),
            Stage::Sign => write!(f, "Signing inner tarball"),
            Stage::Bundle => write!(f, "Creating outer tarball"),
        }
    }
}

/// Files produced by a package build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `<name>.tar.gz`
    pub inner: PathBuf,
    /// `<name>.tar.gz.sha1` or `<name>.tar.gz.sha256`
    pub signature: PathBuf,
    /// `<name>.tar`, the distributable package
    pub outer: PathBuf,
}

/// A package directory to be archived, signed and bundled
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub source_dir: PathBuf,
}

impl Package {
    pub fn new(source_dir: &Path) -> Result<Self> {
        Ok(Self {
            name: utils::package_name(source_dir)?,
            source_dir: source_dir.to_path_buf(),
        })
    }

    /// Run archive, sign and bundle in order.
    ///
    /// Each stage consumes the path returned by the previous one and the run
    /// stops at the first failure. Artifacts already written are left in place.
    pub fn build<F>(&self, ctx: &Context, key: &Path, digest: Digest, mut progress: F) -> Result<Artifacts>
    where
        F: FnMut(Stage),
    {
        progress(Stage::Archive);
        let inner = archive::create_inner_tarball(ctx, &self.source_dir, &self.name)?;

        progress(Stage::Sign);
        let signature = sign::sign(ctx, &inner, key, digest)?;

        progress(Stage::Bundle);
        let outer = archive::create_outer_tarball(ctx, &self.name, &inner, &signature)?;

        Ok(Artifacts {
            inner,
            signature,
            outer,
        })
    }
}
