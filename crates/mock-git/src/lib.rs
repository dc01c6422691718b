// Copyright 2026 Oxide Computer Company

//! Temporarily replace `git` (or any other command) on `PATH` during tests.
//!
//! A mock installs a substitute executable named after the target command in
//! a private directory placed at the front of `PATH`. The substitute is a copy
//! of the `mock-git-runner` program, which reads a [`SubstitutePlan`] stored
//! beside it and either runs the mock's [`Behavior`] or hands the invocation
//! to the real executable, forwarding arguments, standard streams and the exit
//! code.
//!
//! ```no_run
//! use mock_git::{Interceptor, Reply};
//!
//! # fn main() -> Result<(), mock_git::MockError> {
//! let handle = Interceptor::git()
//!     .mock(Reply::new().stdout("mocking git bla!\n"), Some("bla"))?;
//!
//! // `git bla` now prints "mocking git bla!"; every other invocation reaches
//! // the real git.
//!
//! handle.restore()?;
//! # Ok(())
//! # }
//! ```
//!
//! `PATH` is process-wide state, so tests that register mocks or run the
//! mocked command should not run concurrently with each other.

#![warn(missing_docs)]

mod behavior;
mod error;
mod mock;
mod plan;
mod registry;
mod resolve;
/// The program installed in place of the mocked command.
pub mod runner;
mod search_path;
mod shim;

#[macro_use]
extern crate newtype_derive;

pub use behavior::{Behavior, Reply};
pub use error::{InstallError, MockError, ResolveError};
pub use mock::{Interceptor, MockHandle, TargetName, mock_git};
pub use plan::{Action, Mode, Override, Selection, SubstitutePlan};
pub use resolve::{RealExecutable, resolve};
pub use runner::RunnerError;
pub use shim::{RUNNER_ENV, RUNNER_NAME};

/// Environment variable carrying the real executable's path into script
/// behaviors.
pub const REAL_EXECUTABLE_ENV: &str = "MOCK_GIT_REAL";
