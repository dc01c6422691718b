// Copyright 2026 Oxide Computer Company

//! Locating the real executable behind a mocked command name.

use crate::error::ResolveError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::{env, ffi::OsStr, fmt};

/// Absolute path to the executable that answered to a command name before any
/// mock was installed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealExecutable(Utf8PathBuf);

impl RealExecutable {
    /// Wraps a known path, skipping the lookup.
    pub fn from_path(path: impl Into<Utf8PathBuf>) -> Self {
        RealExecutable(path.into())
    }

    /// The absolute path.
    pub fn path(&self) -> &Utf8Path {
        &self.0
    }

    /// The path with every backslash doubled, for embedding inside a quoted
    /// string literal of generated source text.
    ///
    /// Installed substitutes read the path from their plan and never need
    /// this form. It is for behaviors that bake the real executable into
    /// their own script source instead of reading `MOCK_GIT_REAL`.
    pub fn escaped(&self) -> String {
        self.0.as_str().replace('\\', "\\\\")
    }
}

impl fmt::Display for RealExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Looks up `name` on `search_path`, which must not contain any active shim
/// directory.
pub fn resolve(
    name: &str,
    search_path: impl AsRef<OsStr>,
) -> Result<RealExecutable, ResolveError> {
    let cwd = env::current_dir().map_err(ResolveError::CurrentDir)?;
    let found = which::which_in(name, Some(search_path), &cwd).map_err(
        |err| ResolveError::NotFound { name: name.to_owned(), err },
    )?;
    let found = if found.is_absolute() { found } else { cwd.join(found) };
    let found = Utf8PathBuf::try_from(found)
        .map_err(|e| ResolveError::NonUtf8Path(e.into_path_buf()))?;
    tracing::debug!(name, path = %found, "resolved real executable");
    Ok(RealExecutable(found))
}
