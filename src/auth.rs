use std::env;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dialoguer::{Password, theme::ColorfulTheme};
use serde::{Deserialize, Serialize};

use crate::palette::Palette;
use crate::utils::{strip_controls_and_escapes, trim_line};

pub const API_KEY_ENV: &str = "HYPERCHAT_API_KEY";
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    ConfigFile,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::ConfigFile => "local config file",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Resolves the API key, prompting and persisting it on first use.
///
/// Returns an error when no key is stored and the user enters a blank
/// line; nothing is written in that case.
pub fn ensure_api_key(config_path: &Path) -> Result<String> {
    if let Some((api_key, source)) = lookup_api_key(config_path)? {
        println!(
            "{}",
            Palette::paint(
                Palette::INFO,
                format!("API key loaded from the {}.", source.description())
            )
        );
        return Ok(api_key);
    }

    println!(
        "{}",
        Palette::paint(Palette::WARNING, "API key not found.")
    );
    let api_key = prompt_for_api_key()?;
    if api_key.is_empty() {
        bail!(
            "No API key provided. Set {} or run `hyperchat key --set <KEY>`.",
            API_KEY_ENV
        );
    }

    store_api_key(config_path, &api_key)?;
    println!(
        "{}",
        Palette::paint(
            Palette::SUCCESS,
            format!(
                "API key saved to {} for future use.",
                config_path.display()
            )
        )
    );

    Ok(api_key)
}

pub fn lookup_api_key(config_path: &Path) -> Result<Option<(String, ApiKeySource)>> {
    // 1. Environment variable
    if let Ok(value) = env::var(API_KEY_ENV)
        && !value.trim().is_empty()
    {
        return Ok(Some((value, ApiKeySource::Environment)));
    }

    // 2. Config file
    let Some(config) = read_config_file(config_path)? else {
        return Ok(None);
    };

    let key = config
        .api_key
        .as_deref()
        .and_then(trim_line)
        .map(str::to_string);

    Ok(key.map(|api_key| (api_key, ApiKeySource::ConfigFile)))
}

pub fn store_api_key(config_path: &Path, api_key: &str) -> Result<()> {
    let trimmed = trim_line(api_key).with_context(|| "Cannot store an empty API key")?;

    let config = ConfigFile {
        api_key: Some(trimmed.to_string()),
    };

    write_config_file(config_path, &config)
}

pub fn clear_api_key(config_path: &Path) -> Result<bool> {
    let Some(config) = read_config_file(config_path)? else {
        return Ok(false);
    };

    if config.api_key.as_deref().and_then(trim_line).is_none() {
        return Ok(false);
    }

    fs::remove_file(config_path).with_context(|| {
        format!(
            "Failed to remove config file at {}",
            config_path.display()
        )
    })?;
    Ok(true)
}

fn prompt_for_api_key() -> Result<String> {
    println!(
        "{} It's stored locally for future use.",
        Palette::paint(Palette::SUCCESS, "Enter your Hyperbolic API key.")
    );
    let raw_password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API Key")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read the API key from the terminal")?;

    let password = strip_controls_and_escapes(&raw_password);
    Ok(password.trim().to_string())
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(parse_config_contents(&contents, path)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read config file at {}", path.display()))
        }
    }
}

fn write_config_file(path: &Path, value: &ConfigFile) -> Result<()> {
    let contents = serialize_config(value)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write config file at {}", path.display()))?;
    Ok(())
}

fn parse_config_contents(contents: &str, path: &Path) -> Result<Option<ConfigFile>> {
    if contents.trim().is_empty() {
        return Ok(Some(ConfigFile::default()));
    }

    let parsed: ConfigFile = serde_json::from_str(contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(Some(parsed))
}

fn serialize_config(value: &ConfigFile) -> Result<String> {
    let contents = serde_json::to_string_pretty(value)?;
    Ok(format!("{}\n", contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_config_contents_handles_empty() {
        let path = Path::new("config.json");
        let parsed = parse_config_contents("   \n", path).unwrap();
        let config = parsed.expect("expected config for empty contents");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn serialize_config_uses_api_key_field() {
        let config = ConfigFile {
            api_key: Some("test-key".to_string()),
        };

        let serialized = serialize_config(&config).unwrap();
        assert!(serialized.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(serialized.trim()).unwrap();
        assert_eq!(parsed["apiKey"], "test-key");
    }

    #[test]
    fn file_doesnt_exist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let missing = read_config_file(&path).unwrap();
        assert!(missing.is_none());
        assert!(lookup_api_key(&path).unwrap().is_none());
    }

    #[test]
    fn stored_key_is_returned_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiKey": "X"}"#).unwrap();

        let (key, source) = lookup_api_key(&path).unwrap().expect("key should load");
        assert_eq!(key, "X");
        assert_eq!(source, ApiKeySource::ConfigFile);
    }

    #[test]
    fn blank_stored_key_is_treated_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiKey": "   "}"#).unwrap();

        assert!(lookup_api_key(&path).unwrap().is_none());
    }

    #[test]
    fn overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        store_api_key(&path, "fake_key").unwrap();
        store_api_key(&path, "real_key").unwrap();

        let (key, _) = lookup_api_key(&path).unwrap().expect("key should load");
        assert_eq!(key, "real_key");

        let cleared = clear_api_key(&path).unwrap();
        assert!(cleared);
        assert!(lookup_api_key(&path).unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn store_rejects_blank_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let err = store_api_key(&path, "  \t ").unwrap_err();
        assert!(err.to_string().contains("empty API key"));
        assert!(!path.exists());
    }

    #[test]
    fn store_trims_surrounding_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        store_api_key(&path, "  spaced-key \n").unwrap();
        let (key, _) = lookup_api_key(&path).unwrap().expect("key should load");
        assert_eq!(key, "spaced-key");
    }

    #[test]
    fn clear_without_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(!clear_api_key(&path).unwrap());

        fs::write(&path, "{}").unwrap();
        assert!(!clear_api_key(&path).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn unparsable_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
