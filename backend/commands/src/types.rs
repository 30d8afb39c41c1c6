//! Administrative command types.

/// A command entry in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDef {
    /// Command name as typed after the prefix (e.g. "setLLMUrl").
    pub key: String,
    pub description: String,
    /// Reply sent when the command is given without an argument.
    pub usage: String,
    /// Only super administrators may run it; others are silently ignored.
    pub admin_only: bool,
}

/// A detected command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub key: String,
    /// The prefix that introduced the command, empty when none was used.
    pub prefix: String,
    /// Trimmed text after the command name.
    pub args: String,
}
