use std::env;

use log::*;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Reads a boolean flag from the environment variable `name`.
pub fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok(), default)
}

/// Reads `name` from the environment, logging and falling back to `default` when it is missing or empty.
pub fn env_or_default(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => {
            info!("🪛️ {name} is not set. Using the default value, '{default}'.");
            default.to_string()
        },
    }
}
