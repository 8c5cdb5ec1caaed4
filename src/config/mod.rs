use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analysis::AnalysisSettings;
use crate::llm::openai::DEFAULT_BASE_URL;

/// Completion service settings from the `[llm]` block.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Stage settings from the `[analysis]` block.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct AnalysisConfig {
    pub message_window: Option<usize>,
    pub leadership_temperature: Option<f32>,
    pub alignment_temperature: Option<f32>,
    pub synthesis_temperature: Option<f32>,
}

/// Top-level compass config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct CompassConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl CompassConfig {
    /// Load config from `path`, or ~/.compass/config.toml. Returns default if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        if !path.exists() {
            return Ok(CompassConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: CompassConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        self.llm.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn max_retries(&self) -> u32 {
        self.llm.max_retries.unwrap_or(2)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs.unwrap_or(120))
    }

    /// Stage settings with config values layered over the defaults.
    pub fn analysis_settings(&self, model_override: Option<&str>) -> AnalysisSettings {
        let defaults = AnalysisSettings::default();
        let a = &self.analysis;
        AnalysisSettings {
            model: model_override
                .map(str::to_string)
                .or_else(|| self.llm.model.clone())
                .unwrap_or(defaults.model),
            leadership_temperature: a
                .leadership_temperature
                .unwrap_or(defaults.leadership_temperature),
            alignment_temperature: a
                .alignment_temperature
                .unwrap_or(defaults.alignment_temperature),
            synthesis_temperature: a
                .synthesis_temperature
                .unwrap_or(defaults.synthesis_temperature),
            message_window: a.message_window.unwrap_or(defaults.message_window),
        }
    }

    /// Display config with secrets redacted.
    pub fn display_redacted(&self) -> String {
        let mut lines = vec!["[llm]".to_string()];
        let llm = &self.llm;
        if let Some(ref key) = llm.api_key {
            lines.push(format!("  api_key = \"{}\"", redact(key)));
        }
        if let Some(ref cmd) = llm.api_key_command {
            lines.push(format!("  api_key_command = \"{cmd}\""));
        }
        lines.push(format!("  base_url = \"{}\"", self.base_url()));
        let settings = self.analysis_settings(None);
        lines.push(format!("  model = \"{}\"", settings.model));
        lines.push(format!("  max_retries = {}", self.max_retries()));
        lines.push(format!("  timeout_secs = {}", self.timeout().as_secs()));
        lines.push("[analysis]".to_string());
        lines.push(format!("  message_window = {}", settings.message_window));
        lines.push(format!("  leadership_temperature = {}", settings.leadership_temperature));
        lines.push(format!("  alignment_temperature = {}", settings.alignment_temperature));
        lines.push(format!("  synthesis_temperature = {}", settings.synthesis_temperature));
        lines.join("\n")
    }
}

fn redact(key: &str) -> String {
    if key.len() > 8 && key.is_char_boundary(4) && key.is_char_boundary(key.len() - 4) {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "****".to_string()
    }
}

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Resolve the API key through the chain: CLI flag > env var > config key > config command.
pub fn resolve_api_key(cli_flag: Option<&str>, env_var_name: &str, config: &LlmConfig) -> Result<String> {
    // 1. CLI flag
    if let Some(key) = cli_flag {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    // 2. Environment variable
    if let Ok(val) = std::env::var(env_var_name) {
        if !val.is_empty() {
            return Ok(val);
        }
    }

    // 3. Config file api_key
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    // 4. External command
    if let Some(ref cmd) = config.api_key_command {
        if !cmd.is_empty() {
            let output = std::process::Command::new("sh")
                .arg("-c")
                .arg(cmd)
                .output()
                .with_context(|| format!("Failed to run api_key_command: {cmd}"))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!(
                    "api_key_command failed (exit {}): {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                );
            }

            let secret = String::from_utf8(output.stdout)
                .context("api_key_command output is not valid UTF-8")?
                .trim()
                .to_string();

            if !secret.is_empty() {
                return Ok(secret);
            }
        }
    }

    bail!(
        "No API key found. Provide via --api-key, {} env var, or ~/.compass/config.toml",
        env_var_name
    );
}

/// Path to the config file: ~/.compass/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".compass").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.compass/config.toml
# Credential resolution order: --api-key > OPENAI_API_KEY > api_key > api_key_command

[llm]
# api_key = "your-openai-api-key"
# api_key_command = "your-secrets-manager-command-here"
# base_url = "https://api.openai.com/v1"
# model = "gpt-4"
# max_retries = 2
# timeout_secs = 120

[analysis]
# message_window = 25
# leadership_temperature = 0.3
# alignment_temperature = 0.3
# synthesis_temperature = 0.2
"#
}

/// Create the config file at `path` (or the default location) unless it exists.
pub fn init_config(path: Option<&Path>) -> Result<bool> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CompassConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_retries(), 2);
        assert_eq!(config.analysis_settings(None).model, "gpt-4");
    }

    #[test]
    fn template_parses_and_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(init_config(Some(&path)).unwrap());
        assert!(!init_config(Some(&path)).unwrap());
        let config = CompassConfig::load(Some(&path)).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn values_layer_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[llm]\nmodel = \"gpt-4o\"\nbase_url = \"http://localhost:1234/v1\"\n\n[analysis]\nmessage_window = 10\nsynthesis_temperature = 0.0\n",
        )
        .unwrap();
        let config = CompassConfig::load(Some(&path)).unwrap();
        let settings = config.analysis_settings(None);
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.message_window, 10);
        assert_eq!(settings.synthesis_temperature, 0.0);
        assert_eq!(settings.leadership_temperature, 0.3);
        assert_eq!(config.analysis_settings(Some("other")).model, "other");
        assert_eq!(config.base_url(), "http://localhost:1234/v1");
    }

    #[test]
    fn cli_flag_wins_and_config_key_is_used() {
        let llm = LlmConfig {
            api_key: Some("from-config".into()),
            ..LlmConfig::default()
        };
        assert_eq!(
            resolve_api_key(Some("from-flag"), "COMPASS_TEST_UNSET_VAR", &llm).unwrap(),
            "from-flag"
        );
        assert_eq!(
            resolve_api_key(None, "COMPASS_TEST_UNSET_VAR", &llm).unwrap(),
            "from-config"
        );
        assert!(resolve_api_key(None, "COMPASS_TEST_UNSET_VAR", &LlmConfig::default()).is_err());
    }

    #[test]
    fn redacted_display_hides_key() {
        let config = CompassConfig {
            llm: LlmConfig {
                api_key: Some("sk-abcdefghijklmnop".into()),
                ..LlmConfig::default()
            },
            ..CompassConfig::default()
        };
        let shown = config.display_redacted();
        assert!(shown.contains("sk-a...mnop"));
        assert!(!shown.contains("abcdefghijkl"));
    }
}
