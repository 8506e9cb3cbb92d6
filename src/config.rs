use crate::digest::Digest;
use crate::result::Result;
use crate::utils;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "gwpack.toml";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub package: Option<PackageSection>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub digest: Option<String>,

    #[serde(rename = "output-folder", default)]
    pub output_folder: Option<String>,

    #[serde(default)]
    pub openssl: Option<String>,
}

/// Resolved build defaults; relative paths are anchored at the config file's directory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub key: Option<PathBuf>,
    pub digest: Option<Digest>,
    pub output_folder: Option<PathBuf>,
    pub openssl: Option<PathBuf>,
}

impl Config {
    /// Load `path`, or `gwpack.toml` from `cwd` if present, or nothing
    pub fn discover(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = cwd.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        utils::verify_file_exists(path)?;
        let content = fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base_dir)
    }

    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let config: ConfigToml = toml::from_str(content)?;
        let section = config.package.unwrap_or_default();

        let digest: Option<Digest> = section.digest.as_deref().map(str::parse).transpose()?;
        let resolve = |value: Option<String>| value.map(|v| utils::resolve(base_dir, Path::new(&v)));

        // a bare program name is looked up on PATH, not next to the config
        let openssl = section.openssl.map(|program| {
            if Path::new(&program).components().count() > 1 {
                utils::resolve(base_dir, Path::new(&program))
            } else {
                PathBuf::from(program)
            }
        });

        Ok(Config {
            key: resolve(section.key),
            digest,
            output_folder: resolve(section.output_folder),
            openssl,
        })
    }
}
