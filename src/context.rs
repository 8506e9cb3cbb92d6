use std::path::PathBuf;

/// Context passed throughout the application containing global configuration
#[derive(Clone, Debug)]
pub struct Context {
    /// Enable verbose output (show command execution details)
    pub verbose: bool,

    /// Signing tool invoked for `dgst -sign` / `dgst -verify`
    pub openssl: PathBuf,

    /// Directory receiving the package artifacts
    pub output_folder: PathBuf,
}

impl Context {
    pub fn new(openssl: PathBuf, output_folder: PathBuf, verbose: bool) -> Self {
        Self {
            verbose,
            openssl,
            output_folder,
        }
    }
}
