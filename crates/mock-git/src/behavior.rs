// Copyright 2026 Oxide Computer Company

//! What a mock does when it is activated.

/// The behavior of an activated mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Script source run under an interpreter.
    ///
    /// The source is stored in its own file and run as
    /// `interpreter <file> <args...>`, where `args` are the arguments the
    /// mocked command received. Standard streams are inherited and the
    /// interpreter's exit code becomes the mocked command's exit code.
    Script {
        /// The interpreter program, looked up on `PATH`.
        interpreter: String,
        /// The script source.
        source: String,
    },

    /// A canned response.
    Reply(Reply),
}

impl Behavior {
    /// A POSIX shell script.
    pub fn shell(source: impl Into<String>) -> Self {
        Behavior::script("sh", source)
    }

    /// Script source run under `interpreter`.
    pub fn script(
        interpreter: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Behavior::Script {
            interpreter: interpreter.into(),
            source: source.into(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Behavior::Script { interpreter, source } => {
                interpreter.trim().is_empty() || source.trim().is_empty()
            }
            Behavior::Reply(_) => false,
        }
    }
}

impl From<&str> for Behavior {
    fn from(source: &str) -> Self {
        Behavior::shell(source)
    }
}

impl From<String> for Behavior {
    fn from(source: String) -> Self {
        Behavior::shell(source)
    }
}

impl From<Reply> for Behavior {
    fn from(reply: Reply) -> Self {
        Behavior::Reply(reply)
    }
}

/// Fixed output and exit code for an activated mock.
///
/// Text is written verbatim; include a trailing newline if one is expected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) exit_code: i32,
}

impl Reply {
    /// A reply that prints nothing and exits with 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text written to standard output.
    pub fn stdout(mut self, text: impl Into<String>) -> Self {
        self.stdout = text.into();
        self
    }

    /// Sets the text written to standard error.
    pub fn stderr(mut self, text: impl Into<String>) -> Self {
        self.stderr = text.into();
        self
    }

    /// Sets the exit code.
    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }
}
