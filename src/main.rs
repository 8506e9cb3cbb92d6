mod args;
mod cmd;
mod config;
mod context;
mod digest;
mod error;
mod input;
mod package;
mod result;
mod utils;

use args::{Action, Args, BuildArgs, VerifyArgs};
use config::Config;
use context::Context;
use input::{Interactive, NoInput, Prompt};
use package::Package;
use std::path::PathBuf;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    // Parse command-line arguments
    let Args {
        verbose,
        no_input,
        config: config_path,
        action,
    } = Args::parse();

    let cwd = std::env::current_dir()?;
    let config = Config::discover(config_path.as_deref(), &cwd)?;

    cliclack::intro("gwpack")?;

    match action {
        Action::Build(build_args) => build(build_args, config, verbose, no_input),
        Action::Verify(verify_args) => verify(verify_args, config, verbose),
    }
}

fn build(args: BuildArgs, config: Config, verbose: bool, no_input: bool) -> result::Result<()> {
    let (mut quiet, mut interactive) = (NoInput, Interactive);
    let prompt: &mut dyn Prompt = if no_input { &mut quiet } else { &mut interactive };
    let inputs = input::collect(args, config, prompt)?;

    let package = Package::new(&inputs.source)?;
    let ctx = Context::new(inputs.openssl, inputs.output_folder, verbose);

    cliclack::log::info(format!(
        "Preparing package {} ({} signature)",
        package.name, inputs.digest
    ))?;

    let spinner = cliclack::spinner();
    spinner.start("Building package...");

    let result = package.build(&ctx, &inputs.key, inputs.digest, |stage| {
        spinner.set_message(format!("{}...", stage));
    });

    let artifacts = match result {
        Ok(artifacts) => {
            spinner.stop("Package built");
            artifacts
        }
        Err(e) => {
            spinner.error("Package build failed");
            return Err(e);
        }
    };

    let members = package::archive::list_members(&artifacts.outer)?;
    cliclack::log::remark(format!(
        "{} contains {}",
        artifacts.outer.display(),
        members.join(", ")
    ))?;
    cliclack::outro(format!("Created package: {}", artifacts.outer.display()))?;
    Ok(())
}

fn verify(args: VerifyArgs, config: Config, verbose: bool) -> result::Result<()> {
    let openssl = args
        .openssl
        .or(config.openssl)
        .unwrap_or_else(|| PathBuf::from("openssl"));
    let ctx = Context::new(openssl, PathBuf::from("."), verbose);

    let spinner = cliclack::spinner();
    spinner.start(format!("Verifying {}...", args.package.display()));

    match package::verify::verify(&ctx, &args.package, &args.public_key) {
        Ok(verified) => {
            spinner.stop(format!(
                "{} matches {} ({})",
                verified.inner, verified.signature, verified.digest
            ));
            cliclack::outro("Signature verified")?;
            Ok(())
        }
        Err(e) => {
            spinner.error("Verification failed");
            Err(e)
        }
    }
}
