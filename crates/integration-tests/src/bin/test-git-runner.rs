// Copyright 2026 Oxide Computer Company

//! Runner binary for the integration tests.
//!
//! Cargo only builds binaries of the package under test, so this crate
//! carries its own copy of the substitute program rather than relying on
//! `mock-git-runner` having been built.

fn main() {
    mock_git::runner::main()
}
