// Copyright 2026 Oxide Computer Company

//! The document that tells an installed substitute what to do.

use crate::resolve::RealExecutable;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;

/// Everything an installed substitute needs to handle one invocation.
///
/// Stored as JSON beside the substitute executable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutePlan {
    /// The mocked command name.
    pub target: String,
    /// Where invocations no override applies to are sent: the executable
    /// captured by the newest override.
    pub delegate: RealExecutable,
    /// Active overrides, oldest first.
    pub overrides: Vec<Override>,
}

/// One registered mock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// Registry identifier, unique within the process that registered it.
    pub id: u64,
    /// The real executable captured when this override was registered.
    pub delegate: RealExecutable,
    /// When the override applies and what it does.
    #[serde(flatten)]
    pub mode: Mode,
}

/// When an override applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Mode {
    /// Every invocation.
    AlwaysRun {
        /// What to run.
        action: Action,
    },
    /// Invocations whose argument vector contains `filter` exactly.
    FilteredRun {
        /// The token to look for.
        filter: String,
        /// What to run.
        action: Action,
    },
}

impl Mode {
    /// Returns the action if this mode applies to `argv`.
    ///
    /// `argv` is the full argument vector, program name included.
    pub fn applies_to(&self, argv: &[OsString]) -> Option<&Action> {
        match self {
            Mode::AlwaysRun { action } => Some(action),
            Mode::FilteredRun { filter, action } => argv
                .iter()
                .any(|arg| arg.to_str() == Some(filter.as_str()))
                .then_some(action),
        }
    }

    /// The filter token, if any.
    pub fn filter(&self) -> Option<&str> {
        match self {
            Mode::AlwaysRun { .. } => None,
            Mode::FilteredRun { filter, .. } => Some(filter),
        }
    }

    pub(crate) fn action(&self) -> &Action {
        match self {
            Mode::AlwaysRun { action } | Mode::FilteredRun { action, .. } => {
                action
            }
        }
    }
}

/// What an activated override does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    /// Run a script file under an interpreter.
    Script {
        /// The interpreter program.
        interpreter: String,
        /// The script file.
        path: Utf8PathBuf,
    },
    /// Print fixed text and exit.
    Reply {
        /// Text for standard output.
        stdout: String,
        /// Text for standard error.
        stderr: String,
        /// The exit code.
        exit_code: i32,
    },
}

impl Action {
    /// The script file backing this action, if any.
    pub fn script_path(&self) -> Option<&Utf8Path> {
        match self {
            Action::Script { path, .. } => Some(path),
            Action::Reply { .. } => None,
        }
    }
}

/// The outcome of matching an invocation against a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Run this override's action.
    Run(&'a Override),
    /// Hand the invocation to the real executable.
    Delegate(&'a RealExecutable),
}

impl SubstitutePlan {
    /// Points `delegate` at the newest override's captured executable.
    ///
    /// Leaves `delegate` alone when there are no overrides.
    pub fn refresh_delegate(&mut self) {
        if let Some(newest) = self.overrides.last() {
            self.delegate = newest.delegate.clone();
        }
    }

    /// Picks the handler for `argv`.
    ///
    /// The most recently installed override that applies wins. If none
    /// applies, the invocation goes straight to the real executable, never to
    /// another override.
    pub fn select(&self, argv: &[OsString]) -> Selection<'_> {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.mode.applies_to(argv).is_some())
            .map_or(Selection::Delegate(&self.delegate), Selection::Run)
    }

    /// The plan file's path for a substitute executable at `exe`.
    pub fn path_for(exe: &Utf8Path) -> Utf8PathBuf {
        let stem = exe.file_stem().unwrap_or("substitute");
        exe.with_file_name(format!("{stem}.mock.json"))
    }
}
