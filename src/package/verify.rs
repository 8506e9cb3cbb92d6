use super::{archive, sign};
use crate::context::Context;
use crate::digest::Digest;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static SCRATCH_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Outcome of a successful package verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub inner: String,
    pub signature: String,
    pub digest: Digest,
}

/// Layout of an outer tarball: one inner tarball plus its signature
#[derive(Debug, PartialEq, Eq)]
struct Layout {
    inner: String,
    signature: String,
    digest: Digest,
}

fn classify(members: &[String]) -> Result<Layout> {
    let (signatures, others): (Vec<&String>, Vec<&String>) = members
        .iter()
        .partition(|m| Digest::from_signature_path(Path::new(m.as_str())).is_some());

    let signature = match signatures.as_slice() {
        [one] => (*one).clone(),
        [] => return Err(Error::MalformedPackage("no signature file".into())),
        _ => return Err(Error::MalformedPackage("more than one signature file".into())),
    };

    let inner = match others.as_slice() {
        [one] if one.ends_with(".tar.gz") || one.ends_with(".tar") => (*one).clone(),
        [] => return Err(Error::MalformedPackage("no inner tarball".into())),
        [one] => {
            return Err(Error::MalformedPackage(format!("{} is not a tarball", one)));
        }
        _ => {
            return Err(Error::MalformedPackage(format!(
                "unexpected members: {}",
                others.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            )));
        }
    };

    let digest = Digest::from_signature_path(Path::new(&signature))
        .ok_or_else(|| Error::MalformedPackage(format!("unknown signature type {}", signature)))?;

    if signature != format!("{}.{}", inner, digest.extension()) {
        return Err(Error::MalformedPackage(format!(
            "signature {} does not belong to {}",
            signature, inner
        )));
    }

    Ok(Layout {
        inner,
        signature,
        digest,
    })
}

fn scratch_dir(package: &Path) -> PathBuf {
    let stem = package
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "package".to_string());
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("gwpack-{}-{}-{}", stem, std::process::id(), seq))
}

/// Verify an outer tarball against the signer's public key.
///
/// Members are unpacked into a scratch directory that is removed afterwards,
/// whatever the outcome.
pub fn verify(ctx: &Context, package: &Path, public_key: &Path) -> Result<Verified> {
    utils::verify_file_exists(package)?;
    if !public_key.is_file() {
        return Err(Error::KeyNotFound(public_key.to_path_buf()));
    }

    let temp_dir = scratch_dir(package);
    if temp_dir.exists() {
        fs::remove_dir_all(&temp_dir)?;
    }
    fs::create_dir_all(&temp_dir)?;

    let result = verify_in(ctx, package, public_key, &temp_dir);
    keep_outcome(result, fs::remove_dir_all(&temp_dir))
}

/// A cleanup failure is only reported when the verification itself succeeded
fn keep_outcome<T>(result: Result<T>, cleanup: std::io::Result<()>) -> Result<T> {
    match (result, cleanup) {
        (Ok(_), Err(e)) => Err(e.into()),
        (result, _) => result,
    }
}

fn verify_in(ctx: &Context, package: &Path, public_key: &Path, temp_dir: &Path) -> Result<Verified> {
    let members = archive::unpack_flat(package, temp_dir)?;
    let layout = classify(&members)?;

    if ctx.verbose {
        println!(
            "Checking {} against {} ({})",
            layout.inner, layout.signature, layout.digest
        );
    }

    sign::verify(
        ctx,
        &temp_dir.join(&layout.inner),
        &temp_dir.join(&layout.signature),
        public_key,
        layout.digest,
    )?;

    Ok(Verified {
        inner: layout.inner,
        signature: layout.signature,
        digest: layout.digest,
    })
}
