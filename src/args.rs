use crate::digest::Digest;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Command-line arguments for the gwpack tool
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Fail instead of prompting for missing values
    pub no_input: bool,

    /// Path to a gwpack.toml config file
    pub config: Option<PathBuf>,

    pub action: Action,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Build(BuildArgs),
    Verify(VerifyArgs),
}

/// Inputs to the packaging pipeline; anything left `None` is taken from
/// the config file or prompted for
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildArgs {
    pub source: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub digest: Option<Digest>,
    pub output: Option<PathBuf>,
    pub openssl: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct VerifyArgs {
    pub package: PathBuf,
    pub public_key: PathBuf,
    pub openssl: Option<PathBuf>,
}

fn parse_digest(value: &str) -> Result<Digest, String> {
    value.parse::<Digest>().map_err(|e| e.to_string())
}

fn openssl_arg() -> Arg {
    Arg::new("openssl")
        .long("openssl")
        .value_name("PROGRAM")
        .env("GWPACK_OPENSSL")
        .help("Signing tool used for `dgst -sign` / `dgst -verify` (default: openssl)")
}

fn build_command() -> Command {
    Command::new("build")
        .about("Archive, sign and bundle a package directory (default)")
        .arg(
            Arg::new("source")
                .value_name("DIR")
                .help("Package directory; its name becomes the package name"),
        )
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .value_name("FILE")
                .env("GWPACK_KEY")
                .help("Private key of the signing certificate (PEM)"),
        )
        .arg(
            Arg::new("digest")
                .short('d')
                .long("digest")
                .value_name("DIGEST")
                .env("GWPACK_DIGEST")
                .value_parser(parse_digest)
                .help("Signature digest: 1 (SHA-1) or 256 (SHA-256)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .env("GWPACK_OUTPUT")
                .help("Directory receiving the package files (default: current directory)"),
        )
        .arg(openssl_arg())
}

fn verify_command() -> Command {
    Command::new("verify")
        .about("Check the signature of a package against a public key")
        .arg(
            Arg::new("package")
                .value_name("PACKAGE")
                .required(true)
                .help("Outer tarball (<name>.tar)"),
        )
        .arg(
            Arg::new("public-key")
                .short('p')
                .long("public-key")
                .value_name("FILE")
                .required(true)
                .help("Public key of the signing certificate (PEM)"),
        )
        .arg(openssl_arg())
}

impl Args {
    pub fn command() -> Command {
        Command::new("gwpack")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Signed package builder for gateway applications")
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Enable verbose output"),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .global(true)
                    .help("Config file (default: ./gwpack.toml when present)"),
            )
            .arg(
                Arg::new("no-input")
                    .long("no-input")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Never prompt; fail when a value is missing"),
            )
            .subcommand(build_command())
            .subcommand(verify_command())
    }

    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    #[cfg(test)]
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&Self::command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let path = |m: &ArgMatches, id: &str| m.get_one::<String>(id).map(PathBuf::from);

        let action = match matches.subcommand() {
            Some(("verify", sub)) => Action::Verify(VerifyArgs {
                package: path(sub, "package").unwrap_or_default(),
                public_key: path(sub, "public-key").unwrap_or_default(),
                openssl: path(sub, "openssl"),
            }),
            Some(("build", sub)) => Action::Build(BuildArgs {
                source: path(sub, "source"),
                key: path(sub, "key"),
                digest: sub.get_one::<Digest>("digest").copied(),
                output: path(sub, "output"),
                openssl: path(sub, "openssl"),
            }),
            _ => Action::Build(BuildArgs::default()),
        };

        Self {
            verbose: matches.get_flag("verbose"),
            no_input: matches.get_flag("no-input"),
            config: path(matches, "config"),
            action,
        }
    }
}
