use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;

use crate::error::RelayError;

/// The command to run under the shadow console: a program and its arguments,
/// passed through to the child untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Splits `argv`-style tokens into program and arguments.
    ///
    /// Fails with [`RelayError::MissingCommand`] when there is nothing to run.
    pub fn from_args<I, S>(tokens: I) -> Result<Self, RelayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let program = tokens
            .next()
            .filter(|p| !p.is_empty())
            .ok_or(RelayError::MissingCommand)?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// A `Command` that inherits the caller's environment, working directory
    /// and standard streams. Argument quoting is left to the platform layer.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandLine {
    /// Human-readable rendering for diagnostics; not a shell-exact quoting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
