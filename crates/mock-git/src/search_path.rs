// Copyright 2026 Oxide Computer Company

//! Editing `PATH`-style search lists.

use camino::Utf8Path;
use std::{
    env::{self, JoinPathsError},
    ffi::{OsStr, OsString},
    path::PathBuf,
};

/// Splits `path` and drops every entry equal to one of `shim_dirs`.
pub(crate) fn strip(path: &OsStr, shim_dirs: &[&Utf8Path]) -> Vec<PathBuf> {
    env::split_paths(path)
        .filter(|entry| {
            !shim_dirs.iter().any(|dir| entry.as_path() == dir.as_std_path())
        })
        .collect()
}

/// Places `shim_dirs` in front of `base`.
pub(crate) fn compose(
    shim_dirs: &[&Utf8Path],
    base: &[PathBuf],
) -> Result<OsString, JoinPathsError> {
    env::join_paths(
        shim_dirs
            .iter()
            .map(|dir| dir.as_std_path())
            .chain(base.iter().map(PathBuf::as_path)),
    )
}
