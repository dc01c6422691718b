// Copyright 2026 Oxide Computer Company

//! Mocks that only answer to invocations containing a filter token.

use crate::git_interceptor;
use anyhow::Result;
use integration_tests::*;
use mock_git::{Behavior, Reply};
use serial_test::serial;

const LOG: &str = "mocking git bla!";

/// The filter activates the mock, bare `git` reaches the real git, and
/// restoring removes the mock.
#[test]
#[serial]
fn test_mock_and_unmock_git_bla() -> Result<()> {
    let env = TestEnvironment::new()?;
    let handle = git_interceptor()
        .mock(Behavior::shell(format!("echo '{LOG}'")), Some("bla"))?;

    assert_eq!(env.git(&["bla"])?.stdout, line(LOG));
    assert_ne!(env.git(&[])?.stdout, line(LOG));

    handle.restore()?;
    assert_ne!(env.git(&["bla"])?.stdout, line(LOG));

    Ok(())
}

/// The filter token may appear anywhere among the arguments.
#[test]
#[serial]
fn test_mock_and_unmock_git_no_pager_bla() -> Result<()> {
    let env = TestEnvironment::new()?;
    let handle =
        git_interceptor().mock(Reply::new().stdout(line(LOG)), Some("bla"))?;

    assert_eq!(env.git(&["--no-pager", "bla"])?.stdout, line(LOG));
    assert_ne!(env.git(&[])?.stdout, line(LOG));

    handle.restore()?;
    let after = env.git(&["--no-pager", "bla"])?;
    assert_ne!(after.stdout, line(LOG));
    // The real git does not know "bla".
    assert_ne!(after.code, Some(0));

    Ok(())
}

/// Invocations through a shell resolve the mock the same way.
#[test]
#[serial]
fn test_shell_resolves_mock() -> Result<()> {
    let env = TestEnvironment::new()?;
    let _handle =
        git_interceptor().mock(Reply::new().stdout(line(LOG)), Some("bla"))?;

    assert_eq!(env.sh("git bla")?.stdout, line(LOG));
    assert_eq!(env.sh("git --no-pager bla")?.stdout, line(LOG));
    assert_ne!(env.sh("git")?.stdout, line(LOG));

    Ok(())
}

/// A filtered script receives every argument, in order, without the program
/// name.
#[test]
#[serial]
fn test_passing_arguments_while_mocking_only_commit() -> Result<()> {
    let env = TestEnvironment::new()?;
    let handle = git_interceptor().mock("echo \"$@\"", Some("commit"))?;

    let actual = env.git(&[
        "commit",
        "--obviously-invalid-arg",
        "-m",
        "second commit with spaces!",
    ])?;
    assert_eq!(actual.stderr, "");
    assert_eq!(
        actual.stdout,
        line("commit --obviously-invalid-arg -m second commit with spaces!")
    );
    assert_eq!(actual.code, Some(0));

    handle.restore()?;
    Ok(())
}

/// A filter must match an argument exactly.
#[test]
#[serial]
fn test_filter_is_exact() -> Result<()> {
    let env = TestEnvironment::new()?;
    let _handle =
        git_interceptor().mock(Reply::new().stdout(line(LOG)), Some("log"))?;

    assert_eq!(env.git(&["log"])?.stdout, line(LOG));

    // "--log" is not "log": this goes to the real git, which rejects the
    // option.
    let real = env.git(&["--log"])?;
    assert_ne!(real.stdout, line(LOG));
    assert_ne!(real.code, Some(0));

    Ok(())
}
