// Copyright 2026 Oxide Computer Company

//! Process-wide record of installed substitutes.
//!
//! Each mocked command name owns one shim directory, placed at the front of
//! `PATH` while at least one override for that name is active.

use crate::{
    behavior::Behavior,
    error::{InstallError, MockError},
    resolve::{self, RealExecutable},
    search_path,
    shim::{self, TargetShim},
};
use camino::Utf8Path;
use std::{
    collections::BTreeMap,
    env,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

static REGISTRY: Mutex<Registry> = Mutex::new(Registry::new());

#[derive(Debug)]
struct Registry {
    shims: BTreeMap<String, TargetShim>,
    next_id: u64,
}

/// A request to install one override.
pub(crate) struct Registration<'a> {
    pub(crate) target: &'a str,
    pub(crate) behavior: &'a Behavior,
    pub(crate) filter: Option<&'a str>,
    pub(crate) runner: Option<&'a Utf8Path>,
    pub(crate) real_executable: Option<&'a RealExecutable>,
}

/// Installs an override, returning its id.
///
/// Either the override is fully installed, or the registry, the shim
/// directory and `PATH` are left as they were.
pub(crate) fn register(req: Registration<'_>) -> Result<u64, MockError> {
    let mut registry = lock();
    let base = registry.unmocked_path();

    let real = match req.real_executable {
        Some(real) => real.clone(),
        None => {
            let search = env::join_paths(&base).map_err(InstallError::from)?;
            resolve::resolve(req.target, search)?
        }
    };

    let id = registry.next_id;
    registry.next_id += 1;

    if let Some(shim) = registry.shims.get_mut(req.target) {
        shim.push(id, req.behavior, req.filter, real)?;
    } else {
        let runner = shim::locate_runner(req.runner)?;
        let mut shim = TargetShim::create(req.target, &runner, real.clone())?;
        shim.push(id, req.behavior, req.filter, real)?;
        registry.shims.insert(req.target.to_owned(), shim);
        if let Err(err) = registry.apply_path(&base) {
            registry.shims.remove(req.target);
            return Err(err.into());
        }
    }

    tracing::debug!(
        command = req.target,
        id,
        filter = req.filter,
        "registered mock"
    );
    Ok(id)
}

/// Removes the override `id` for `target`. Unknown ids are ignored.
pub(crate) fn unregister(target: &str, id: u64) -> Result<(), InstallError> {
    let mut registry = lock();
    let base = registry.unmocked_path();

    let Some(shim) = registry.shims.get_mut(target) else {
        return Ok(());
    };
    let removed = shim.remove(id);
    if shim.is_empty() {
        registry.shims.remove(target);
        registry.apply_path(&base)?;
        tracing::debug!(command = target, "removed shim directory");
    }

    if removed? {
        tracing::debug!(command = target, id, "restored mock");
    }
    Ok(())
}

/// Returns true if any override for `target` is active.
pub(crate) fn is_mocked(target: &str) -> bool {
    lock().shims.contains_key(target)
}

fn lock() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Registry {
    const fn new() -> Self {
        Registry { shims: BTreeMap::new(), next_id: 0 }
    }

    fn dirs(&self) -> Vec<&Utf8Path> {
        self.shims.values().map(TargetShim::dir).collect()
    }

    /// The current `PATH` without any shim directory.
    fn unmocked_path(&self) -> Vec<PathBuf> {
        let current = env::var_os("PATH").unwrap_or_default();
        search_path::strip(&current, &self.dirs())
    }

    /// Sets `PATH` to the active shim directories followed by `base`.
    fn apply_path(&self, base: &[PathBuf]) -> Result<(), InstallError> {
        let path = search_path::compose(&self.dirs(), base)?;
        tracing::debug!(path = ?path, "updating PATH");
        // SAFETY: every write to PATH made by this crate happens while the
        // registry lock is held. Callers are documented to keep other threads
        // from touching the environment while mocks are being installed or
        // restored.
        unsafe {
            env::set_var("PATH", path);
        }
        Ok(())
    }
}
