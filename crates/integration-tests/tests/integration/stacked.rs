// Copyright 2026 Oxide Computer Company

//! Several mocks active for the same command at once.

use crate::{git_interceptor, interceptor};
use anyhow::Result;
use integration_tests::*;
use mock_git::Reply;
use serial_test::serial;

/// Mocks with distinct filters answer only to their own token, and anything
/// else reaches the real git.
#[test]
#[serial]
fn test_mocking_bar_does_not_affect_foo() -> Result<()> {
    let env = TestEnvironment::new()?;
    let foo_log = "mocking foo!";
    let _foo =
        git_interceptor().mock(format!("echo '{foo_log}'"), Some("foo"))?;
    let bar_log = "mocking bar!";
    let _bar =
        git_interceptor().mock(format!("echo '{bar_log}'"), Some("bar"))?;

    assert_eq!(env.git(&["bar"])?.stdout, line(bar_log));
    assert_eq!(env.git(&["--no-pager", "bar"])?.stdout, line(bar_log));
    assert_eq!(env.git(&["foo"])?.stdout, line(foo_log));
    assert_eq!(env.git(&["--no-pager", "foo"])?.stdout, line(foo_log));

    let log = env.git(&["log"])?;
    assert_eq!(log.stderr, "");
    assert_eq!(log.code, Some(0));
    assert!(log.stdout.contains("initial commit"), "real git log: {log:?}");

    Ok(())
}

/// Each stacked mock reports its own exit code.
#[test]
#[serial]
fn test_passing_through_exit_code_with_multiple_mocks() -> Result<()> {
    let env = TestEnvironment::new()?;
    let one = git_interceptor().mock("exit 1", Some("one"))?;
    let two = git_interceptor().mock("exit 2", Some("two"))?;

    assert_eq!(env.git(&["one"])?.code, Some(1));
    assert_eq!(env.git(&["two"])?.code, Some(2));

    one.restore()?;
    two.restore()?;
    Ok(())
}

/// Stacked mocks do not chain: a mock never runs because another mock did
/// not match.
#[test]
#[serial]
fn test_no_cross_activation() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    env.install_fixture("greet", "echo \"real $*\"; exit 7\n")?;
    let _one = interceptor("greet")
        .mock(Reply::new().stdout("one\n").exit_code(1), Some("one"))?;
    let _two = interceptor("greet")
        .mock(Reply::new().stdout("two\n").exit_code(2), Some("two"))?;

    let one = env.run("greet", &["one"])?;
    assert_eq!((one.stdout.as_str(), one.code), ("one\n", Some(1)));
    let two = env.run("greet", &["two"])?;
    assert_eq!((two.stdout.as_str(), two.code), ("two\n", Some(2)));
    let neither = env.run("greet", &["three"])?;
    assert_eq!(
        (neither.stdout.as_str(), neither.code),
        ("real three\n", Some(7))
    );

    Ok(())
}

/// Each mock keeps delegating to the executable it captured, even after a
/// newer mock with a different one is restored.
#[test]
#[serial]
fn test_restore_keeps_remaining_delegate() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    env.install_fixture("greet", "echo \"real $*\"\n")?;
    let other = env.install_fixture("other-greet", "echo \"other $*\"\n")?;

    let _pinned = interceptor("greet")
        .with_real_executable(other)
        .mock(Reply::new().stdout("a\n"), Some("a"))?;
    let newer = interceptor("greet")
        .mock(Reply::new().stdout("b\n"), Some("b"))?;
    assert_eq!(env.run("greet", &["c"])?.stdout, "real c\n");

    newer.restore()?;
    assert_eq!(env.run("greet", &["a"])?.stdout, "a\n");
    assert_eq!(env.run("greet", &["b"])?.stdout, "other b\n");
    assert_eq!(env.run("greet", &["c"])?.stdout, "other c\n");

    Ok(())
}

/// Restoring out of installation order leaves the remaining mock working.
#[test]
#[serial]
fn test_restore_out_of_order() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    env.install_fixture("greet", "echo real\n")?;
    let first = interceptor("greet")
        .mock(Reply::new().stdout("first\n"), Some("a"))?;
    let second = interceptor("greet")
        .mock(Reply::new().stdout("second\n"), Some("b"))?;

    first.restore()?;
    assert_eq!(env.run("greet", &["a"])?.stdout, "real\n");
    assert_eq!(env.run("greet", &["b"])?.stdout, "second\n");

    second.restore()?;
    assert_eq!(env.run("greet", &["b"])?.stdout, "real\n");
    assert!(!interceptor("greet").is_active());

    Ok(())
}

/// A filtered mock on top of an unconditional one falls through to it; an
/// unconditional mock on top shadows everything.
#[test]
#[serial]
fn test_filtered_over_unconditional() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    env.install_fixture("greet", "echo real\n")?;

    let base =
        interceptor("greet").mock(Reply::new().stdout("base\n"), None)?;
    let filtered = interceptor("greet")
        .mock(Reply::new().stdout("filtered\n"), Some("x"))?;
    assert_eq!(env.run("greet", &["x"])?.stdout, "filtered\n");
    assert_eq!(env.run("greet", &["y"])?.stdout, "base\n");

    let top = interceptor("greet").mock(Reply::new().stdout("top\n"), None)?;
    assert_eq!(env.run("greet", &["x"])?.stdout, "top\n");

    top.restore()?;
    filtered.restore()?;
    base.restore()?;
    assert_eq!(env.run("greet", &["x"])?.stdout, "real\n");

    Ok(())
}

/// Dropping a handle restores its mock.
#[test]
#[serial]
fn test_drop_restores() -> Result<()> {
    let env = TestEnvironment::new()?;
    {
        let _handle =
            git_interceptor().mock(Reply::new().stdout("dropped\n"), None)?;
        assert_eq!(env.git(&["status"])?.stdout, "dropped\n");
    }
    assert_ne!(env.git(&["status"])?.stdout, "dropped\n");
    assert!(!git_interceptor().is_active());

    Ok(())
}
