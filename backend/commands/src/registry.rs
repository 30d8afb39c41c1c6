//! Administrative command registry.
use crate::types::CommandDef;

pub const SET_LLM_URL: &str = "setLLMUrl";
pub const SET_LLM_KEY: &str = "setLLMKey";
pub const SET_LLM_MODEL: &str = "setLLMModel";

fn admin_command(key: &str, description: &str, usage: &str) -> CommandDef {
    CommandDef {
        key: key.to_string(),
        description: description.to_string(),
        usage: usage.to_string(),
        admin_only: true,
    }
}

/// Build the built-in command registry.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        admin_command(
            SET_LLM_URL,
            "Set the completion endpoint base URL.",
            "用法: /setLLMUrl <URL>，例如 /setLLMUrl https://api.openai.com/v1",
        ),
        admin_command(
            SET_LLM_KEY,
            "Set the completion API key.",
            "用法: /setLLMKey <API Key>",
        ),
        admin_command(
            SET_LLM_MODEL,
            "Set the completion model.",
            "用法: /setLLMModel <模型名>，例如 /setLLMModel gpt-3.5-turbo",
        ),
    ]
}

pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn register(&mut self, def: CommandDef) {
        self.commands.push(def);
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Find a command by its key. Case-sensitive.
    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}
