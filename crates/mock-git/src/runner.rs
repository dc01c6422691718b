// Copyright 2026 Oxide Computer Company

//! The substitute that answers to the mocked command name.
//!
//! The registering process copies the runner program into a shim directory
//! under the mocked command's name, next to a [`SubstitutePlan`]. Each
//! invocation reads the plan, then either runs the matching override's action
//! or hands the invocation to the real executable.
//!
//! A crate that cannot rely on the `mock-git-runner` binary being built can
//! provide its own, which only needs to call [`main`]:
//!
//! ```no_run
//! fn main() {
//!     mock_git::runner::main()
//! }
//! ```

use crate::{
    REAL_EXECUTABLE_ENV,
    plan::{Action, Selection, SubstitutePlan},
    resolve::RealExecutable,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::{
    env,
    error::Error as _,
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process::{self, Command, ExitStatus, Stdio},
};
use thiserror::Error;

/// Exit code reported when the runner itself fails, e.g. when the real
/// executable cannot be started.
pub const FAILURE_EXIT_CODE: i32 = 127;

/// An error inside the substitute process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// The runner could not determine where it is installed.
    #[error("cannot determine the path of the running executable")]
    CurrentExe(#[source] io::Error),

    /// The runner's own path is not valid UTF-8.
    #[error("executable path is not valid UTF-8: {0:?}")]
    NonUtf8Exe(PathBuf),

    /// The plan file could not be read.
    #[error("failed to read substitute plan {path}")]
    ReadPlan {
        /// The plan file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The plan file is not a valid plan.
    #[error("failed to parse substitute plan {path}")]
    ParsePlan {
        /// The plan file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        err: serde_json::Error,
    },

    /// A behavior interpreter or the real executable could not be started.
    #[error("failed to execute {program}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// A canned reply could not be written.
    #[error("failed to write reply")]
    WriteReply(#[source] io::Error),
}

/// Entry point for a runner binary. Never returns.
pub fn main() -> ! {
    let argv: Vec<OsString> = env::args_os().collect();
    process::exit(run(&argv))
}

/// Handles one invocation, returning the exit code to report.
///
/// Runner failures are printed to standard error and reported as
/// [`FAILURE_EXIT_CODE`].
pub fn run(argv: &[OsString]) -> i32 {
    match try_run(argv) {
        Ok(code) => code,
        Err(err) => {
            report(argv, &err);
            FAILURE_EXIT_CODE
        }
    }
}

fn try_run(argv: &[OsString]) -> Result<i32, RunnerError> {
    let exe = env::current_exe().map_err(RunnerError::CurrentExe)?;
    let exe = Utf8PathBuf::try_from(exe)
        .map_err(|e| RunnerError::NonUtf8Exe(e.into_path_buf()))?;
    let plan = load_plan(&SubstitutePlan::path_for(&exe))?;
    execute(&plan, argv)
}

/// Reads a plan file.
pub fn load_plan(path: &Utf8Path) -> Result<SubstitutePlan, RunnerError> {
    let contents = fs_err::read_to_string(path).map_err(|err| {
        RunnerError::ReadPlan { path: path.to_owned(), err }
    })?;
    serde_json::from_str(&contents)
        .map_err(|err| RunnerError::ParsePlan { path: path.to_owned(), err })
}

/// Handles `argv` according to `plan`.
///
/// `argv[0]` is the substitute's own program name. It takes part in filter
/// matching but is never forwarded.
pub fn execute(
    plan: &SubstitutePlan,
    argv: &[OsString],
) -> Result<i32, RunnerError> {
    let args = argv.get(1..).unwrap_or_default();
    match plan.select(argv) {
        Selection::Run(o) => run_action(o.mode.action(), args, &o.delegate),
        Selection::Delegate(real) => delegate(real, args),
    }
}

fn run_action(
    action: &Action,
    args: &[OsString],
    real: &RealExecutable,
) -> Result<i32, RunnerError> {
    match action {
        Action::Script { interpreter, path } => {
            let status = Command::new(interpreter)
                .arg(path)
                .args(args)
                .env(REAL_EXECUTABLE_ENV, real.path())
                .status()
                .map_err(|err| RunnerError::Spawn {
                    program: interpreter.clone(),
                    err,
                })?;
            Ok(exit_code(status))
        }
        Action::Reply { stdout, stderr, exit_code } => {
            write_all(&mut io::stdout().lock(), stdout)?;
            write_all(&mut io::stderr().lock(), stderr)?;
            Ok(*exit_code)
        }
    }
}

/// Runs the real executable with `args` and the runner's standard streams.
fn delegate(
    real: &RealExecutable,
    args: &[OsString],
) -> Result<i32, RunnerError> {
    let status = Command::new(real.path())
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|err| RunnerError::Spawn {
            program: real.to_string(),
            err,
        })?;
    Ok(exit_code(status))
}

/// A child without an exit code (killed by a signal) counts as success.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(0)
}

fn write_all(out: &mut dyn Write, text: &str) -> Result<(), RunnerError> {
    if text.is_empty() {
        return Ok(());
    }
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(RunnerError::WriteReply)
}

fn report(argv: &[OsString], err: &RunnerError) {
    let program = argv
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::RUNNER_NAME.to_owned());
    let mut message = format!("{program}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    eprintln!("{message}");
}
