//! Command detection: identify administrative commands in inbound text.
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Accepted command prefixes. A bare command name is also accepted.
pub const COMMAND_PREFIXES: [&str; 4] = ["/", "!", "！", "."];

/// Detect a command at the start of a message.
///
/// Matching is by prefix, so `/setLLMModelgpt-4o` carries the argument
/// `gpt-4o`. Returns `None` for a normal chat message.
pub fn detect_command(text: &str, registry: &CommandRegistry) -> Option<CommandInvocation> {
    let trimmed = text.trim();

    for def in registry.all() {
        let prefixed = COMMAND_PREFIXES
            .iter()
            .copied()
            .chain(std::iter::once(""))
            .find_map(|prefix| {
                trimmed
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix(def.key.as_str()))
                    .map(|rest| (prefix, rest))
            });

        if let Some((prefix, rest)) = prefixed {
            return Some(CommandInvocation {
                key: def.key.clone(),
                prefix: prefix.to_string(),
                args: rest.trim().to_string(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Option<CommandInvocation> {
        detect_command(text, &CommandRegistry::new())
    }

    #[test]
    fn test_all_prefixes() {
        for text in [
            "/setLLMModel gpt-4o",
            "!setLLMModel gpt-4o",
            "！setLLMModel gpt-4o",
            ".setLLMModel gpt-4o",
            "setLLMModel gpt-4o",
        ] {
            let inv = detect(text).unwrap_or_else(|| panic!("not detected: {text}"));
            assert_eq!(inv.key, "setLLMModel");
            assert_eq!(inv.args, "gpt-4o");
        }
    }

    #[test]
    fn test_args_trimmed_and_prefix_matched() {
        let inv = detect("  /setLLMUrl   https://api.moonshot.cn/v1/  ").unwrap();
        assert_eq!(inv.key, "setLLMUrl");
        assert_eq!(inv.prefix, "/");
        assert_eq!(inv.args, "https://api.moonshot.cn/v1/");

        let glued = detect("/setLLMKeysk-abc").unwrap();
        assert_eq!(glued.key, "setLLMKey");
        assert_eq!(glued.args, "sk-abc");
    }

    #[test]
    fn test_missing_argument_is_still_a_command() {
        let inv = detect("/setLLMKey").unwrap();
        assert_eq!(inv.args, "");
    }

    #[test]
    fn test_chat_is_not_a_command() {
        assert!(detect("你好").is_none());
        assert!(detect("/help").is_none());
        assert!(detect("please setLLMUrl for me").is_none());
        assert!(detect("/setllmurl x").is_none());
    }
}
