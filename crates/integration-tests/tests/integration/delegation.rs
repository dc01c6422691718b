// Copyright 2026 Oxide Computer Company

//! Invocations a mock does not apply to are passed through to the real
//! executable.

use crate::{git_interceptor, interceptor};
use anyhow::{Context, Result};
use integration_tests::*;
use mock_git::Reply;
use serial_test::serial;
use std::{
    io::Write,
    process::{Command, Stdio},
};

/// Delegated invocations reproduce the real git's output and exit code
/// exactly.
#[test]
#[serial]
fn test_delegation_is_transparent() -> Result<()> {
    let env = TestEnvironment::new()?;
    let cases: [&[&str]; 4] = [
        &["log", "--format=%s"],
        &["rev-parse", "--abbrev-ref", "HEAD"],
        &["no-such-subcommand"],
        &["status", "--porcelain", "--no-such-option"],
    ];

    let expected = cases
        .iter()
        .map(|args| env.git(args))
        .collect::<Result<Vec<_>>>()?;

    let handle = git_interceptor()
        .mock(Reply::new().stdout("mocked\n"), Some("never-passed"))?;
    for (args, expected) in cases.iter().zip(&expected) {
        let actual = env.git(args)?;
        assert_eq!(&actual, expected, "git {args:?}");
    }
    handle.restore()?;

    assert_eq!(expected[0].stdout, "initial commit\n");
    assert_eq!(expected[1].stdout, "main\n");
    assert_ne!(expected[2].code, Some(0));

    Ok(())
}

/// Standard input reaches the real executable.
#[test]
#[serial]
fn test_delegation_forwards_stdin() -> Result<()> {
    let env = TestEnvironment::new()?;
    let _handle = git_interceptor()
        .mock(Reply::new().stdout("mocked\n"), Some("never-passed"))?;

    let mut child = Command::new("git")
        .current_dir(env.workspace_root())
        .args(["hash-object", "--stdin"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .context("failed to spawn git")?;
    child
        .stdin
        .take()
        .context("stdin was not piped")?
        .write_all(b"hello\n")?;
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    // `printf 'hello\n' | git hash-object --stdin`
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "ce013625030ba8dba906f756967f9e9ca394464a\n"
    );

    Ok(())
}

/// Arguments reach the real executable verbatim and in order.
#[test]
#[serial]
fn test_delegation_forwards_arguments_verbatim() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    env.install_fixture(
        "greet",
        "for arg in \"$@\"; do printf '[%s]' \"$arg\"; done\necho\n",
    )?;
    let _handle =
        interceptor("greet").mock(Reply::new().stdout("mocked\n"), Some("x"))?;

    let actual =
        env.run("greet", &["  spaced  ", "", "--flag=a b", "*", "'q'"])?;
    assert_eq!(actual.stdout, "[  spaced  ][][--flag=a b][*]['q']\n");
    assert_eq!(actual.code, Some(0));

    Ok(())
}

/// A real executable killed by a signal is reported as success.
#[test]
#[serial]
fn test_delegation_signal_exit_is_success() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    env.install_fixture("greet", "kill -9 $$\n")?;

    let unmocked = env.run("greet", &["now"])?;
    assert_eq!(unmocked.code, None, "the fixture dies from a signal");

    let _handle =
        interceptor("greet").mock(Reply::new().stdout("mocked\n"), Some("x"))?;
    let delegated = env.run("greet", &["now"])?;
    assert_eq!(delegated.code, Some(0));

    Ok(())
}
