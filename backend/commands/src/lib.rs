pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

use std::sync::Arc;

use soulforge_config::{LlmField, RuntimeConfig};

pub use detection::{detect_command, COMMAND_PREFIXES};
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse};
pub use handlers::SetLlmHandler;
pub use registry::{builtin_commands, CommandRegistry, SET_LLM_KEY, SET_LLM_MODEL, SET_LLM_URL};
pub use types::{CommandDef, CommandInvocation};

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher(config: Arc<RuntimeConfig>) -> CommandDispatcher {
    let registry = CommandRegistry::new();
    let wiring = [
        (SET_LLM_URL, LlmField::Url),
        (SET_LLM_KEY, LlmField::ApiKey),
        (SET_LLM_MODEL, LlmField::Model),
    ];

    let mut handlers: Vec<(&str, SetLlmHandler)> = Vec::new();
    for (key, field) in wiring {
        let usage = registry
            .find_by_key(key)
            .map(|def| def.usage.clone())
            .unwrap_or_default();
        handlers.push((key, SetLlmHandler { field, usage, config: Arc::clone(&config) }));
    }

    let mut dispatcher = CommandDispatcher::new(registry);
    for (key, handler) in handlers {
        dispatcher.register(key, Arc::new(handler));
    }
    dispatcher
}
