// ABOUTME: Argument vector for an external command.
// ABOUTME: Guarantees a program is present and renders shell-readable text for operators.

use nonempty::NonEmpty;
use serde::de::{self, Deserialize, Deserializer};
use std::fmt;

/// A program and its arguments, passed to the OS without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: NonEmpty<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            argv: NonEmpty::new(program.into()),
        }
    }

    pub fn from_vec(parts: Vec<String>) -> Option<Self> {
        NonEmpty::from_vec(parts).map(|argv| Self { argv })
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.argv.push(arg.into());
        }
        self
    }

    /// Run this command through a prefix such as `sudo` or `doas -n`.
    /// An empty prefix leaves the command unchanged.
    pub fn with_prefix(self, prefix: &[String]) -> Self {
        let Some((program, rest)) = prefix.split_first() else {
            return self;
        };

        let NonEmpty { head, tail } = self.argv;
        let mut argv = NonEmpty::new(program.clone());
        for part in rest.iter().cloned().chain(std::iter::once(head)).chain(tail) {
            argv.push(part);
        }
        Self { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv.head
    }

    pub fn arguments(&self) -> &[String] {
        &self.argv.tail
    }

    /// Program followed by arguments.
    pub fn to_vec(&self) -> Vec<String> {
        self.argv.iter().cloned().collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_quoted(f, part)?;
        }
        Ok(())
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    let plain = !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@+%,".contains(c));
    if plain {
        f.write_str(part)
    } else {
        write!(f, "'{}'", part.replace('\'', "'\\''"))
    }
}

impl<'de> Deserialize<'de> for CommandLine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parts = Vec::<String>::deserialize(deserializer)?;
        CommandLine::from_vec(parts).ok_or_else(|| de::Error::custom("command cannot be empty"))
    }
}
