//! Config redaction: safe-to-log config snapshots with secrets masked.

use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &["apiKey", "api_key", "apikey", "key", "token", "secret", "password"];

/// Mask a secret, keeping a four-character hint: `"sk-abcdef"` → `"sk-a***"`.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    if secret.chars().count() > 4 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Redact a config JSON value, masking every secret field.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_secret_key(key) => Value::String(mask_secret(s)),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let v = json!({ "llm": { "url": "https://api.openai.com/v1", "apiKey": "sk-abcdef123456" } });
        let redacted = redact(&v);
        assert_eq!(redacted["llm"]["apiKey"], "sk-a***");
        assert_eq!(redacted["llm"]["url"], "https://api.openai.com/v1");
    }

    #[test]
    fn short_secret_fully_masked() {
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn masks_multibyte_secret_on_char_boundary() {
        assert_eq!(mask_secret("密钥密钥密钥"), "密钥密钥***");
    }
}
