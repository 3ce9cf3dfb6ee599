//! Environment and file configuration helpers.
//!
//! Environment overrides are optional: an unset or blank variable means
//! "not overridden", while a value that does not parse is a
//! [`ClientError::Config`] naming the variable.
//!
//! ```rust,ignore
//! use langgraph_client::config::{env_parse, env_var, load_config_file};
//!
//! let api_url = env_var("LANGGRAPH_API_URL").unwrap_or(default_url);
//! let port: Option<u16> = env_parse("PROXY_PORT")?;
//! let settings: MySettings = load_config_file(".agent-chat/config.toml")?;
//! ```

use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::str::FromStr;

/// Value of `key` when it is set and not blank.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse `key` when it is set and not blank.
pub fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| {
                ClientError::Config(format!("Invalid value for {}: '{}' ({})", key, value, e))
            })
        })
        .transpose()
}

/// Boolean switch: `true/1/yes/on` or `false/0/no/off`, case-insensitive.
pub fn env_flag(key: &str) -> Result<Option<bool>> {
    let Some(value) = env_var(key) else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ClientError::Config(format!(
            "Invalid value for {}: '{}' (expected true or false)",
            key, value
        ))),
    }
}

/// Load a config file, picking TOML or JSON from the extension.
pub fn load_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            ClientError::Config(format!("Unable to determine file extension for {:?}", path))
        })?;

    let content = std::fs::read_to_string(path)?;
    match extension.to_lowercase().as_str() {
        "toml" => toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("Failed to parse TOML config from {:?}: {}", path, e))
        }),
        "json" => serde_json::from_str(&content).map_err(|e| {
            ClientError::Config(format!("Failed to parse JSON config from {:?}: {}", path, e))
        }),
        _ => Err(ClientError::Config(format!(
            "Unsupported config file extension: {}",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestConfig {
        name: String,
        port: u16,
        enabled: bool,
    }

    #[test]
    fn test_env_var_ignores_unset_and_blank() {
        assert_eq!(env_var("AGENT_CHAT_TEST_MISSING_VAR_12345"), None);

        env::set_var("AGENT_CHAT_TEST_BLANK", "  ");
        assert_eq!(env_var("AGENT_CHAT_TEST_BLANK"), None);
        env::remove_var("AGENT_CHAT_TEST_BLANK");
    }

    #[test]
    fn test_env_parse() {
        env::set_var("AGENT_CHAT_TEST_PORT", " 4242 ");
        assert_eq!(env_parse::<u16>("AGENT_CHAT_TEST_PORT").unwrap(), Some(4242));
        assert_eq!(env_parse::<u16>("AGENT_CHAT_TEST_PORT_UNSET").unwrap(), None);

        env::set_var("AGENT_CHAT_TEST_PORT_BAD", "not-a-port");
        let err = env_parse::<u16>("AGENT_CHAT_TEST_PORT_BAD").unwrap_err();
        assert!(err.to_string().contains("AGENT_CHAT_TEST_PORT_BAD"));

        env::remove_var("AGENT_CHAT_TEST_PORT");
        env::remove_var("AGENT_CHAT_TEST_PORT_BAD");
    }

    #[test]
    fn test_env_flag_values() {
        for (raw, expected) in [("true", true), ("YES", true), ("1", true), ("off", false), ("0", false)] {
            env::set_var("AGENT_CHAT_TEST_BOOL", raw);
            assert_eq!(env_flag("AGENT_CHAT_TEST_BOOL").unwrap(), Some(expected), "value {raw}");
        }

        env::set_var("AGENT_CHAT_TEST_BOOL", "maybe");
        assert!(matches!(env_flag("AGENT_CHAT_TEST_BOOL"), Err(ClientError::Config(_))));
        env::remove_var("AGENT_CHAT_TEST_BOOL");
        assert_eq!(env_flag("AGENT_CHAT_TEST_BOOL").unwrap(), None);
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = TempDir::new().unwrap();

        let toml_path = dir.path().join("config.toml");
        fs::write(&toml_path, "name = \"chat\"\nport = 2024\nenabled = true\n").unwrap();
        let json_path = dir.path().join("config.json");
        fs::write(&json_path, r#"{"name": "chat", "port": 2024, "enabled": true}"#).unwrap();

        let expected = TestConfig {
            name: "chat".to_string(),
            port: 2024,
            enabled: true,
        };
        assert_eq!(load_config_file::<TestConfig>(&toml_path).unwrap(), expected);
        assert_eq!(load_config_file::<TestConfig>(&json_path).unwrap(), expected);
    }

    #[test]
    fn test_load_config_errors() {
        let dir = TempDir::new().unwrap();

        let yaml_path = dir.path().join("config.yaml");
        fs::write(&yaml_path, "name: chat").unwrap();
        assert!(matches!(load_config_file::<TestConfig>(&yaml_path), Err(ClientError::Config(_))));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "name = ").unwrap();
        assert!(matches!(load_config_file::<TestConfig>(&broken), Err(ClientError::Config(_))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(load_config_file::<TestConfig>(&missing), Err(ClientError::Io(_))));
    }
}
