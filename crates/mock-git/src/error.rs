// Copyright 2026 Oxide Computer Company

//! Errors raised while registering or restoring a mock.

use camino::Utf8PathBuf;
use std::{env::JoinPathsError, io, path::PathBuf};
use thiserror::Error;

/// The real executable could not be located.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// No executable with this name exists on the unmocked search path.
    #[error("could not find real executable {name:?} on PATH")]
    NotFound {
        /// The command name that was looked up.
        name: String,
        /// The error reported by the lookup.
        #[source]
        err: which::Error,
    },

    /// The executable was found, but its path is not valid UTF-8.
    #[error("real executable path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    /// The current directory could not be determined while making a relative
    /// hit absolute.
    #[error("failed to determine current directory")]
    CurrentDir(#[source] io::Error),
}

/// The substitute executable could not be installed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// No runner program was configured or found next to the current
    /// executable.
    #[error(
        "could not find the {name} program (set {env} or call \
         Interceptor::with_runner); searched: {searched:?}"
    )]
    RunnerNotFound {
        /// The runner's file name.
        name: String,
        /// The environment variable that can point at the runner.
        env: &'static str,
        /// Candidate paths that were checked.
        searched: Vec<Utf8PathBuf>,
    },

    /// A configured runner path does not exist.
    #[error("runner program does not exist: {0}")]
    RunnerMissing(Utf8PathBuf),

    /// Creating the shim directory, copying the runner or writing a behavior
    /// file failed.
    #[error("failed to install substitute for {target:?}")]
    Io {
        /// The command being mocked.
        target: String,
        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The substitute plan could not be encoded.
    #[error("failed to encode substitute plan for {target:?}")]
    EncodePlan {
        /// The command being mocked.
        target: String,
        /// The underlying error.
        #[source]
        err: serde_json::Error,
    },

    /// The shim directory cannot be placed on `PATH`.
    #[error("cannot add shim directory to PATH")]
    JoinPaths(#[from] JoinPathsError),
}

/// An error returned by [`Interceptor::mock`](crate::Interceptor::mock) or
/// [`MockHandle::restore`](crate::MockHandle::restore).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MockError {
    /// The target command name is empty.
    #[error("target command name must not be empty")]
    EmptyTarget,

    /// The filter token is empty.
    #[error("command filter must not be empty")]
    EmptyFilter,

    /// The behavior's script source is empty.
    #[error("behavior source must not be empty")]
    EmptyBehavior,

    /// The real executable could not be located.
    #[error("failed to resolve real executable")]
    Resolve(#[from] ResolveError),

    /// The substitute could not be installed or updated.
    #[error("failed to install mock")]
    Install(#[from] InstallError),
}
