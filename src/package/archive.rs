use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::{Archive, Builder};
use walkdir::WalkDir;

/// Compress `source_dir` into `<name>.tar.gz` in the output folder.
///
/// Members are rooted at `<name>/` and written in file-name order with their
/// modes preserved. Symlinks inside the package are stored as links; a
/// symlinked package directory itself is resolved so the root is always a
/// directory entry.
pub fn create_inner_tarball(ctx: &Context, source_dir: &Path, name: &str) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(Error::SourceNotFound(source_dir.to_path_buf()));
    }

    let root = fs::canonicalize(source_dir)?;

    utils::ensure_dir(&ctx.output_folder)?;

    let archive_filename = format!("{}.tar.gz", name);
    let archive_path = ctx.output_folder.join(&archive_filename);

    let tar_gz = File::create(&archive_path)?;
    // an output folder inside the package must not swallow the archive itself
    let own_archive = fs::canonicalize(&archive_path).ok();

    let enc = GzEncoder::new(tar_gz, Compression::default());
    let mut tar = Builder::new(enc);
    tar.follow_symlinks(false);

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();

        if entry.file_name() == archive_filename.as_str()
            && own_archive.is_some()
            && fs::canonicalize(path).ok() == own_archive
        {
            continue;
        }

        let relative = path
            .strip_prefix(&root)
            .map_err(|_| Error::custom(format!("{} is outside {}", path.display(), root.display())))?;
        let member = Path::new(name).join(relative);

        if ctx.verbose {
            println!("a {}", member.display());
        }

        tar.append_path_with_name(path, &member)?;
    }

    tar.into_inner()?.finish()?;

    utils::verify_file_exists(&archive_path)?;
    Ok(archive_path)
}

/// Bundle the inner tarball and its signature into an uncompressed `<name>.tar`.
/// Both files are stored at the archive root under their own file names.
pub fn create_outer_tarball(
    ctx: &Context,
    name: &str,
    inner: &Path,
    signature: &Path,
) -> Result<PathBuf> {
    utils::verify_file_exists(inner)?;
    utils::verify_file_exists(signature)?;

    let outer_path = ctx.output_folder.join(format!("{}.tar", name));
    let mut tar = Builder::new(File::create(&outer_path)?);

    for member in [inner, signature] {
        let member_name = member
            .file_name()
            .ok_or_else(|| Error::MissingFile(member.to_path_buf()))?;
        if ctx.verbose {
            println!("a {}", member_name.to_string_lossy());
        }
        tar.append_path_with_name(member, member_name)?;
    }

    tar.finish()?;
    drop(tar);

    utils::verify_file_exists(&outer_path)?;
    Ok(outer_path)
}

fn open_archive(path: &Path) -> Result<Archive<Box<dyn Read>>> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Archive::new(reader))
}

/// Member paths of a `.tar` or `.tar.gz` archive, in archive order
pub fn list_members(path: &Path) -> Result<Vec<String>> {
    let mut archive = open_archive(path)?;
    let mut members = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        members.push(entry.path()?.to_string_lossy().into_owned());
    }
    Ok(members)
}

/// Extract the regular-file members of a flat archive into `dest`.
/// Returns the extracted file names in archive order.
pub fn unpack_flat(path: &Path, dest: &Path) -> Result<Vec<String>> {
    let mut archive = open_archive(path)?;
    let mut names = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let member = entry.path()?.into_owned();

        if !entry.header().entry_type().is_file() {
            return Err(Error::MalformedPackage(format!(
                "unexpected non-file member {}",
                member.display()
            )));
        }

        let name = match (member.parent(), member.file_name()) {
            (Some(parent), Some(name)) if parent.as_os_str().is_empty() => {
                name.to_string_lossy().into_owned()
            }
            _ => {
                return Err(Error::MalformedPackage(format!(
                    "member {} is not at the archive root",
                    member.display()
                )));
            }
        };

        entry.unpack(dest.join(&name))?;
        names.push(name);
    }

    Ok(names)
}
