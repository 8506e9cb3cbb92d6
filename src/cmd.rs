use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

fn command_line<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Execute a command and stream output to stdout if verbose mode is enabled
pub fn execute<S: AsRef<OsStr>>(ctx: &Context, program: &Path, args: &[S]) -> Result<()> {
    let line = command_line(program, args);
    if ctx.verbose {
        println!("Executing: {}", line);
    }

    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::custom(format!("unable to run {}: {}", program.display(), e)))?;

    // Drain stderr on its own thread so a chatty child cannot fill the pipe
    // while stdout is still being read
    let stderr_reader = child.stderr.take().map(|stderr| {
        thread::spawn(move || {
            BufReader::new(stderr)
                .lines()
                .map_while(|l| l.ok())
                .collect::<Vec<_>>()
        })
    });

    // Stream stdout
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        for line in reader.lines().map_while(|l| l.ok()) {
            if ctx.verbose {
                println!("{}", line);
            }
        }
    }

    // Stderr is kept for the error message
    let errors = match stderr_reader {
        Some(handle) => handle
            .join()
            .map_err(|_| Error::custom(format!("stderr reader for {} panicked", program.display())))?,
        None => Vec::new(),
    };
    if ctx.verbose {
        for line in &errors {
            eprintln!("{}", line);
        }
    }

    let status = child.wait()?;

    if !status.success() {
        let mut msg = format!(
            "{} failed with exit code: {}",
            line,
            status.code().unwrap_or(-1)
        );
        if !errors.is_empty() {
            msg.push_str(": ");
            msg.push_str(errors.join(" ").trim());
        }
        return Err(Error::CommandFailed(msg));
    }

    Ok(())
}

/// Execute a command and capture its output
pub fn execute_with_output<S: AsRef<OsStr>>(
    ctx: &Context,
    program: &Path,
    args: &[S],
) -> Result<String> {
    let line = command_line(program, args);
    if ctx.verbose {
        println!("Executing: {}", line);
    }

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::custom(format!("unable to run {}: {}", program.display(), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} failed: {}",
            line,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
