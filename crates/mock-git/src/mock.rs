// Copyright 2026 Oxide Computer Company

//! Registering mocks and restoring the original command.

use crate::{
    behavior::Behavior,
    error::{InstallError, MockError},
    registry::{self, Registration},
    resolve::RealExecutable,
};
use camino::Utf8PathBuf;

/// Newtype String wrapper naming the command being mocked
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct TargetName(String);
NewtypeDebug! { () pub struct TargetName(String); }
NewtypeDeref! { () pub struct TargetName(String); }
NewtypeDisplay! { () pub struct TargetName(String); }
NewtypeFrom! { () pub struct TargetName(String); }

impl From<&str> for TargetName {
    fn from(name: &str) -> Self {
        TargetName(name.to_owned())
    }
}

/// Installs mocks for one command name.
///
/// ```no_run
/// use mock_git::{Behavior, Interceptor};
///
/// # fn main() -> Result<(), mock_git::MockError> {
/// let interceptor = Interceptor::git();
/// let handle = interceptor.mock(Behavior::shell("echo \"$@\""), None)?;
/// // ... run code that shells out to git ...
/// handle.restore()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Interceptor {
    target: TargetName,
    runner: Option<Utf8PathBuf>,
    real_executable: Option<RealExecutable>,
}

impl Interceptor {
    /// Mocks the command `target`.
    pub fn new(target: impl Into<TargetName>) -> Self {
        Interceptor {
            target: target.into(),
            runner: None,
            real_executable: None,
        }
    }

    /// Mocks `git`.
    pub fn git() -> Self {
        Self::new("git")
    }

    /// Installs the runner program at `path` instead of searching for it.
    pub fn with_runner(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.runner = Some(path.into());
        self
    }

    /// Delegates to `path` instead of looking the command up on `PATH`.
    pub fn with_real_executable(
        mut self,
        path: impl Into<Utf8PathBuf>,
    ) -> Self {
        self.real_executable = Some(RealExecutable::from_path(path));
        self
    }

    /// The mocked command name.
    pub fn target(&self) -> &TargetName {
        &self.target
    }

    /// Installs a mock for the command.
    ///
    /// Without a `filter`, every invocation runs `behavior`. With a filter,
    /// only invocations whose arguments contain the filter token exactly run
    /// `behavior`; every other invocation is passed to the real executable
    /// with the same arguments, standard streams and exit code.
    ///
    /// The real executable is looked up now, skipping any mock already
    /// installed, so delegation never reaches another mock.
    ///
    /// The mock stays active until the returned handle is restored or
    /// dropped.
    pub fn mock(
        &self,
        behavior: impl Into<Behavior>,
        filter: Option<&str>,
    ) -> Result<MockHandle, MockError> {
        let behavior = behavior.into();
        if self.target.trim().is_empty() {
            return Err(MockError::EmptyTarget);
        }
        if filter.is_some_and(str::is_empty) {
            return Err(MockError::EmptyFilter);
        }
        if behavior.is_empty() {
            return Err(MockError::EmptyBehavior);
        }

        let id = registry::register(Registration {
            target: &self.target,
            behavior: &behavior,
            filter,
            runner: self.runner.as_deref(),
            real_executable: self.real_executable.as_ref(),
        })?;

        Ok(MockHandle {
            target: self.target.clone(),
            filter: filter.map(str::to_owned),
            id,
            active: true,
        })
    }

    /// Returns true if any mock for this command is installed.
    pub fn is_active(&self) -> bool {
        registry::is_mocked(&self.target)
    }
}

/// Installs a mock for `git`; see [`Interceptor::mock`].
pub fn mock_git(
    behavior: impl Into<Behavior>,
    filter: Option<&str>,
) -> Result<MockHandle, MockError> {
    Interceptor::git().mock(behavior, filter)
}

/// Keeps a mock installed.
///
/// Restoring (explicitly, or by dropping the handle) removes this mock only;
/// other mocks for the same command stay in place.
#[derive(Debug)]
#[must_use = "dropping a MockHandle restores the command immediately"]
pub struct MockHandle {
    target: TargetName,
    filter: Option<String>,
    id: u64,
    active: bool,
}

impl MockHandle {
    /// The mocked command name.
    pub fn target(&self) -> &TargetName {
        &self.target
    }

    /// The filter token, if the mock has one.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Removes the mock.
    ///
    /// If the substitute cannot be updated the mock stays installed, and
    /// dropping the handle tries once more.
    pub fn restore(mut self) -> Result<(), MockError> {
        self.restore_impl().map_err(MockError::from)
    }

    fn restore_impl(&mut self) -> Result<(), InstallError> {
        if !self.active {
            return Ok(());
        }
        registry::unregister(&self.target, self.id)?;
        self.active = false;
        Ok(())
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        if let Err(err) = self.restore_impl() {
            tracing::warn!(
                command = %self.target,
                error = %err,
                "failed to restore mock"
            );
        }
    }
}
