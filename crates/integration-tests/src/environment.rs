// Copyright 2026 Oxide Computer Company

//! Test environment infrastructure for integration tests.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use camino_tempfile_ext::{fixture::ChildPath, prelude::*};
use std::{
    env,
    ffi::OsStr,
    process::{Command, Output},
};

/// What a command printed and how it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// The exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        }
    }
}

/// A temporary git repository plus a directory for fixture executables.
pub struct TestEnvironment {
    /// Temporary directory that will be cleaned up automatically.
    #[expect(dead_code)]
    temp_dir: Utf8TempDir,
    /// Path to the git repository within the temp directory.
    workspace_root: ChildPath,
    /// Directory holding fixture executables.
    bin_dir: ChildPath,
    /// Whether `bin_dir` has been placed on `PATH`.
    bin_on_path: bool,
}

impl TestEnvironment {
    /// Create a new test environment with a git repository holding one commit.
    pub fn new() -> Result<Self> {
        let temp_dir = Utf8TempDir::with_prefix("mock-git-integration-")
            .context("failed to create temporary directory")?;

        temp_dir.child("workspace").create_dir_all()?;
        temp_dir.child("bin").create_dir_all()?;

        let workspace_root = temp_dir.child("workspace");
        let bin_dir = temp_dir.child("bin");

        Self::run_setup_git(
            &workspace_root,
            &["init", "--initial-branch", "main"],
        )?;
        Self::run_setup_git(
            &workspace_root,
            &["config", "user.name", "Test User"],
        )?;
        Self::run_setup_git(
            &workspace_root,
            &["config", "user.email", "test@example.com"],
        )?;
        workspace_root.child("README.md").write_str("# Test workspace\n")?;
        Self::run_setup_git(&workspace_root, &["add", "README.md"])?;
        Self::run_setup_git(
            &workspace_root,
            &["commit", "-m", "initial commit"],
        )?;

        Ok(Self { temp_dir, workspace_root, bin_dir, bin_on_path: false })
    }

    /// Get the git repository path.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Run `git` as found on the current `PATH`, inside the repository.
    pub fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run("git", args)
    }

    /// Run `program` as found on the current `PATH`, inside the repository.
    pub fn run(
        &self,
        program: &str,
        args: &[impl AsRef<OsStr>],
    ) -> Result<CommandOutput> {
        let output = Command::new(program)
            .current_dir(&self.workspace_root)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute {program}"))?;
        Ok(output.into())
    }

    /// Run a command line through `sh -c`, inside the repository.
    pub fn sh(&self, command_line: &str) -> Result<CommandOutput> {
        self.run("sh", &["-c", command_line])
    }

    /// Write a shell script fixture named `name` into the fixture directory
    /// and put that directory on `PATH`.
    ///
    /// The directory is taken off `PATH` again when the environment is
    /// dropped.
    #[cfg(unix)]
    pub fn install_fixture(
        &mut self,
        name: &str,
        script: &str,
    ) -> Result<Utf8PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let fixture = self.bin_dir.child(name);
        fixture.write_str(&format!("#!/bin/sh\n{script}"))?;
        std::fs::set_permissions(
            fixture.as_path(),
            std::fs::Permissions::from_mode(0o755),
        )
        .with_context(|| {
            format!("failed to make {} executable", fixture.as_path())
        })?;

        if !self.bin_on_path {
            let current = env::var_os("PATH").unwrap_or_default();
            let path = env::join_paths(
                std::iter::once(self.bin_dir.as_std_path().to_path_buf())
                    .chain(env::split_paths(&current)),
            )?;
            // SAFETY: tests using fixtures are serialized, so no other
            // thread reads or writes the environment concurrently.
            unsafe { env::set_var("PATH", path) };
            self.bin_on_path = true;
        }
        Ok(fixture.to_path_buf())
    }

    /// Helper to run git commands while setting up the repository.
    fn run_setup_git(cwd: &Utf8Path, args: &[&str]) -> Result<String> {
        let git =
            std::env::var("GIT").ok().unwrap_or_else(|| String::from("git"));
        let output = Command::new(git)
            .current_dir(cwd)
            .args(args)
            .output()
            .context("failed to execute git command")?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "git command failed: git {}\nstdout: {}\nstderr: {}",
                args.join(" "),
                stdout,
                stderr
            ));
        }

        String::from_utf8(output.stdout)
            .context("git command output was not valid UTF-8")
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if !self.bin_on_path {
            return;
        }
        // Remove only our directory: mocks registered later may still be
        // in front of it.
        let current = env::var_os("PATH").unwrap_or_default();
        let remaining = env::split_paths(&current)
            .filter(|entry| entry.as_path() != self.bin_dir.as_std_path());
        if let Ok(path) = env::join_paths(remaining) {
            // SAFETY: see install_fixture.
            unsafe { env::set_var("PATH", path) };
        }
    }
}
