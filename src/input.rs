use crate::args::BuildArgs;
use crate::config::Config;
use crate::digest::Digest;
use crate::error::Error;
use crate::result::Result;
use std::path::PathBuf;

/// Source of values the command line and config file did not provide
pub trait Prompt {
    fn package_dir(&mut self) -> Result<PathBuf>;
    fn private_key(&mut self) -> Result<PathBuf>;
    fn digest(&mut self) -> Result<Digest>;
}

/// Prompt validator for the digest answer; an `Err` makes cliclack ask again
#[allow(clippy::ptr_arg)]
pub fn validate_digest(input: &String) -> std::result::Result<(), String> {
    input.parse::<Digest>().map(|_| ()).map_err(|e| e.to_string())
}

/// Asks on the terminal with cliclack
pub struct Interactive;

impl Prompt for Interactive {
    fn package_dir(&mut self) -> Result<PathBuf> {
        let dir: String = cliclack::input("Enter path to package directory")
            .placeholder("./myapp")
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter a directory")
                } else {
                    Ok(())
                }
            })
            .interact()?;
        Ok(PathBuf::from(dir.trim()))
    }

    fn private_key(&mut self) -> Result<PathBuf> {
        let key: String = cliclack::input("Enter path to private key file of the signing certificate (pem format)")
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter a key file")
                } else {
                    Ok(())
                }
            })
            .interact()?;
        Ok(PathBuf::from(key.trim()))
    }

    fn digest(&mut self) -> Result<Digest> {
        // invalid answers are re-asked, never defaulted
        let choice: String = cliclack::input("Enter 1 if using sha1 or 256 for sha256")
            .validate(validate_digest)
            .interact()?;
        choice.parse()
    }
}

/// Refuses to ask; used with `--no-input`
pub struct NoInput;

impl Prompt for NoInput {
    fn package_dir(&mut self) -> Result<PathBuf> {
        Err(Error::MissingInput("package directory"))
    }

    fn private_key(&mut self) -> Result<PathBuf> {
        Err(Error::MissingInput("--key"))
    }

    fn digest(&mut self) -> Result<Digest> {
        Err(Error::MissingInput("--digest"))
    }
}

/// Everything a package build needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputs {
    pub source: PathBuf,
    pub key: PathBuf,
    pub digest: Digest,
    pub output_folder: PathBuf,
    pub openssl: PathBuf,
}

/// Merge command line, config and prompts, in that order of precedence.
/// Prompts come in pipeline order: directory, key, digest.
pub fn collect(args: BuildArgs, config: Config, prompt: &mut dyn Prompt) -> Result<BuildInputs> {
    let source = match args.source {
        Some(source) => source,
        None => prompt.package_dir()?,
    };

    let key = match args.key.or(config.key) {
        Some(key) => key,
        None => prompt.private_key()?,
    };

    let digest = match args.digest.or(config.digest) {
        Some(digest) => digest,
        None => prompt.digest()?,
    };

    Ok(BuildInputs {
        source,
        key,
        digest,
        output_folder: args
            .output
            .or(config.output_folder)
            .unwrap_or_else(|| PathBuf::from(".")),
        openssl: args
            .openssl
            .or(config.openssl)
            .unwrap_or_else(|| PathBuf::from("openssl")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays typed answers; digest answers go through the same validator
    /// the terminal prompt uses and are re-asked while it rejects them
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<&'static str>,
        asked: Vec<&'static str>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self) -> Result<&'static str> {
            self.answers
                .pop_front()
                .ok_or_else(|| Error::custom("no more answers"))
        }
    }

    impl Prompt for Scripted {
        fn package_dir(&mut self) -> Result<PathBuf> {
            self.asked.push("dir");
            Ok(PathBuf::from(self.next()?))
        }

        fn private_key(&mut self) -> Result<PathBuf> {
            self.asked.push("key");
            Ok(PathBuf::from(self.next()?))
        }

        fn digest(&mut self) -> Result<Digest> {
            loop {
                self.asked.push("digest");
                let answer = self.next()?.to_string();
                if validate_digest(&answer).is_ok() {
                    return answer.parse();
                }
            }
        }
    }

    #[test]
    fn test_validate_digest() {
        for accepted in ["1", "256", " 256 ", "sha1", "SHA256"] {
            assert!(validate_digest(&accepted.to_string()).is_ok(), "{accepted:?}");
        }
        for rejected in ["", "3", "sha", "512"] {
            let msg = validate_digest(&rejected.to_string()).unwrap_err();
            assert!(msg.starts_with("invalid digest"), "{msg}");
        }
    }

    #[test]
    fn test_prompts_in_pipeline_order() {
        let mut prompt = Scripted::new(&["myapp", "key.pem", "3", "sha", "256"]);
        let inputs = collect(BuildArgs::default(), Config::default(), &mut prompt).unwrap();

        assert_eq!(prompt.asked, vec!["dir", "key", "digest", "digest", "digest"]);
        assert_eq!(
            inputs,
            BuildInputs {
                source: PathBuf::from("myapp"),
                key: PathBuf::from("key.pem"),
                digest: Digest::Sha256,
                output_folder: PathBuf::from("."),
                openssl: PathBuf::from("openssl"),
            }
        );
    }

    #[test]
    fn test_flags_override_config() {
        let args = BuildArgs {
            source: Some(PathBuf::from("myapp")),
            digest: Some(Digest::Sha1),
            ..Default::default()
        };
        let config = Config {
            key: Some(PathBuf::from("/etc/gwpack/key.pem")),
            digest: Some(Digest::Sha256),
            output_folder: Some(PathBuf::from("/srv/packages")),
            openssl: None,
        };

        let inputs = collect(args, config, &mut NoInput).unwrap();
        assert_eq!(inputs.key, PathBuf::from("/etc/gwpack/key.pem"));
        assert_eq!(inputs.digest, Digest::Sha1);
        assert_eq!(inputs.output_folder, PathBuf::from("/srv/packages"));
    }

    #[test]
    fn test_no_input_names_missing_value() {
        let args = BuildArgs {
            source: Some(PathBuf::from("myapp")),
            key: Some(PathBuf::from("key.pem")),
            ..Default::default()
        };
        let err = collect(args, Config::default(), &mut NoInput).unwrap_err();
        assert!(matches!(err, Error::MissingInput("--digest")));
    }
}
