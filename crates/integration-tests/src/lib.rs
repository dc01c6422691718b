// Copyright 2026 Oxide Computer Company

//! Integration tests for mock-git.

mod environment;

pub use environment::{CommandOutput, TestEnvironment};

/// The line a mock prints, as seen on standard output.
pub fn line(text: &str) -> String {
    format!("{text}\n")
}
