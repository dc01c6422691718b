// Copyright 2026 Oxide Computer Company

//! The program installed in place of a mocked command.
//!
//! It reads the substitute plan stored beside its own executable and either
//! runs the matching mock or passes the invocation through to the real
//! command.

fn main() {
    mock_git::runner::main()
}
