// Copyright 2026 Oxide Computer Company

//! The on-disk substitute for one command name.
//!
//! A shim directory holds a copy of the runner program named after the target
//! command, the [`SubstitutePlan`] the runner reads, and one file per script
//! behavior.

use crate::{
    behavior::Behavior,
    error::InstallError,
    plan::{Action, Mode, Override, SubstitutePlan},
    resolve::RealExecutable,
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use std::{
    env::{self, consts::EXE_SUFFIX},
    io::{self, Write},
};

/// File name of the runner program, without platform suffix.
pub const RUNNER_NAME: &str = "mock-git-runner";

/// Environment variable naming the runner program to install.
pub const RUNNER_ENV: &str = "MOCK_GIT_RUNNER";

/// Finds the runner program: `configured`, then `$MOCK_GIT_RUNNER`, then next
/// to the current executable or in its parent directory.
pub(crate) fn locate_runner(
    configured: Option<&Utf8Path>,
) -> Result<Utf8PathBuf, InstallError> {
    let explicit = configured
        .map(Utf8Path::to_path_buf)
        .or_else(|| env::var(RUNNER_ENV).ok().map(Utf8PathBuf::from));
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path)
        } else {
            Err(InstallError::RunnerMissing(path))
        };
    }

    let file_name = format!("{RUNNER_NAME}{EXE_SUFFIX}");
    let searched: Vec<Utf8PathBuf> = env::current_exe()
        .ok()
        .and_then(|exe| Utf8PathBuf::try_from(exe).ok())
        .map(|exe| {
            exe.ancestors()
                .skip(1)
                .take(2)
                .map(|dir| dir.join(&file_name))
                .collect()
        })
        .unwrap_or_default();
    searched.iter().find(|candidate| candidate.is_file()).cloned().ok_or_else(
        || InstallError::RunnerNotFound {
            name: file_name.clone(),
            env: RUNNER_ENV,
            searched: searched.clone(),
        },
    )
}

/// An installed substitute and the plan it serves.
#[derive(Debug)]
pub(crate) struct TargetShim {
    dir: Utf8TempDir,
    plan: SubstitutePlan,
}

impl TargetShim {
    /// Creates the shim directory and copies the runner into it.
    ///
    /// Nothing is placed on `PATH` here, and no plan is written until the
    /// first override is pushed.
    pub(crate) fn create(
        target: &str,
        runner: &Utf8Path,
        delegate: RealExecutable,
    ) -> Result<Self, InstallError> {
        let io_err = |err| InstallError::Io { target: target.to_owned(), err };
        let dir = Utf8TempDir::with_prefix(format!("mock-{target}-"))
            .map_err(io_err)?;
        let exe = dir.path().join(format!("{target}{EXE_SUFFIX}"));
        fs_err::copy(runner, &exe).map_err(io_err)?;
        tracing::debug!(
            command = target,
            dir = %dir.path(),
            "created shim directory"
        );
        Ok(TargetShim {
            dir,
            plan: SubstitutePlan {
                target: target.to_owned(),
                delegate,
                overrides: Vec::new(),
            },
        })
    }

    pub(crate) fn dir(&self) -> &Utf8Path {
        self.dir.path()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.plan.overrides.is_empty()
    }

    /// Adds an override and rewrites the plan.
    ///
    /// On failure the override is not left behind.
    pub(crate) fn push(
        &mut self,
        id: u64,
        behavior: &Behavior,
        filter: Option<&str>,
        delegate: RealExecutable,
    ) -> Result<(), InstallError> {
        let action = self.write_action(id, behavior)?;
        let mode = match filter {
            Some(filter) => {
                Mode::FilteredRun { filter: filter.to_owned(), action }
            }
            None => Mode::AlwaysRun { action },
        };
        let previous = self.plan.delegate.clone();
        self.plan.overrides.push(Override { id, delegate, mode });
        self.plan.refresh_delegate();

        if let Err(err) = self.write_plan() {
            if let Some(o) = self.plan.overrides.pop() {
                self.remove_script(&o);
            }
            self.plan.delegate = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Removes the override with this id, rewriting the plan if any overrides
    /// remain. Returns false if no such override exists.
    ///
    /// If the plan cannot be rewritten the override stays installed.
    pub(crate) fn remove(&mut self, id: u64) -> Result<bool, InstallError> {
        let Some(index) = self.plan.overrides.iter().position(|o| o.id == id)
        else {
            return Ok(false);
        };
        let previous = self.plan.delegate.clone();
        let removed = self.plan.overrides.remove(index);
        self.plan.refresh_delegate();

        if !self.is_empty() {
            if let Err(err) = self.write_plan() {
                self.plan.overrides.insert(index, removed);
                self.plan.delegate = previous;
                return Err(err);
            }
        }
        self.remove_script(&removed);
        Ok(true)
    }

    fn write_action(
        &self,
        id: u64,
        behavior: &Behavior,
    ) -> Result<Action, InstallError> {
        match behavior {
            Behavior::Script { interpreter, source } => {
                let path = self.dir().join(format!("behavior-{id}"));
                fs_err::write(&path, source).map_err(|err| {
                    InstallError::Io { target: self.plan.target.clone(), err }
                })?;
                Ok(Action::Script { interpreter: interpreter.clone(), path })
            }
            Behavior::Reply(reply) => Ok(Action::Reply {
                stdout: reply.stdout.clone(),
                stderr: reply.stderr.clone(),
                exit_code: reply.exit_code,
            }),
        }
    }

    fn remove_script(&self, o: &Override) {
        if let Some(path) = o.mode.action().script_path() {
            if let Err(err) = fs_err::remove_file(path) {
                tracing::warn!(%err, "failed to remove behavior file");
            }
        }
    }

    fn write_plan(&self) -> Result<(), InstallError> {
        let target = &self.plan.target;
        let contents = serde_json::to_vec_pretty(&self.plan).map_err(|err| {
            InstallError::EncodePlan { target: target.clone(), err }
        })?;
        let exe = self.dir().join(format!("{target}{EXE_SUFFIX}"));
        let path = SubstitutePlan::path_for(&exe);
        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&contents))
            .map_err(|err| InstallError::Io {
                target: target.clone(),
                err: io::Error::from(err),
            })?;
        tracing::debug!(
            command = %target,
            overrides = self.plan.overrides.len(),
            "wrote substitute plan"
        );
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn plan(&self) -> &SubstitutePlan {
        &self.plan
    }
}
