//! Configuration loading from toolchat.toml and the environment.

use runtime::{
    BindOptions, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, GROQ_API_URL, ToolChoice,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const CONFIG_FILE: &str = "toolchat.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Model client configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Conversation and tool-calling behaviour.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Groq backend configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// OpenAI-compatible API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Groq API key. `GROQ_API_KEY` takes precedence.
    pub api_key: Option<String>,

    pub max_tokens: Option<u32>,

    /// Deadline for each model invocation, in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            api_key: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

/// Chat behaviour configuration.
#[derive(Debug, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Model invocations allowed per exchange.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Subset of tools to bind. All registered tools when absent.
    pub tools: Option<Vec<String>>,

    /// `auto`, `required`, or the name of a tool to force.
    #[serde(default = "default_tool_choice")]
    pub tool_choice: String,

    #[serde(default = "default_true")]
    pub parallel_tool_calls: bool,

    /// When false, replies come from a single model call without tools.
    #[serde(default = "default_true")]
    pub use_tools: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_iterations: default_max_iterations(),
            tools: None,
            tool_choice: default_tool_choice(),
            parallel_tool_calls: true,
            use_tools: true,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_base_url() -> String {
    GROQ_API_URL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_tool_choice() -> String {
    "auto".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load from an explicit path, or from `toolchat.toml` when it exists.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay `GROQ_*` values from `get`. Blank values count as unset.
    pub fn apply_env_with(&mut self, get: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("GROQ_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Some(model) = get("GROQ_MODEL") {
            self.backend.model = model;
        }
        if let Some(raw) = get("GROQ_TEMPERATURE") {
            match raw.trim().parse() {
                Ok(temperature) => self.backend.temperature = temperature,
                Err(_) => warn!(
                    value = %raw,
                    kept = self.backend.temperature,
                    "Invalid GROQ_TEMPERATURE; keeping current temperature"
                ),
            }
        }
    }

    /// Apply command-line overrides, which win over file and environment.
    pub fn apply_overrides(
        &mut self,
        model: Option<String>,
        temperature: Option<f32>,
        system_prompt: Option<String>,
    ) {
        if let Some(model) = model {
            self.backend.model = model;
        }
        if let Some(temperature) = temperature {
            self.backend.temperature = temperature;
        }
        if let Some(system_prompt) = system_prompt {
            self.chat.system_prompt = system_prompt;
        }
    }

    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.backend
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }

    pub fn tool_choice(&self) -> ToolChoice {
        match self.chat.tool_choice.trim() {
            "" | "auto" => ToolChoice::Auto,
            "required" | "any" => ToolChoice::Required,
            name => ToolChoice::Forced(name.to_string()),
        }
    }

    /// Tool selection is ignored while tools are disabled, so a stale name
    /// cannot block plain replies.
    pub fn bind_options(&self) -> BindOptions {
        if !self.chat.use_tools {
            return BindOptions::default();
        }
        BindOptions {
            tools: self.chat.tools.clone(),
            tool_choice: self.tool_choice(),
            parallel_tool_calls: self.chat.parallel_tool_calls,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, "llama-3.1-8b-instant");
        assert_eq!(config.backend.temperature, 0.2);
        assert_eq!(config.backend.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.chat.system_prompt, "You are a helpful assistant.");
        assert_eq!(config.chat.max_iterations, 5);
        assert!(config.chat.use_tools);
        assert_eq!(config.bind_options(), BindOptions::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn parses_full_file() {
        let config = Config::parse(
            r#"
            [backend]
            model = "llama-3.3-70b-versatile"
            temperature = 0.7
            max_tokens = 1024
            timeout_secs = 30

            [chat]
            system_prompt = "Be terse."
            max_iterations = 3
            tools = ["calculate_math", "fetch_weather"]
            tool_choice = "calculate_math"
            parallel_tool_calls = false
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.model, "llama-3.3-70b-versatile");
        assert_eq!(config.backend.max_tokens, Some(1024));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.chat.max_iterations, 3);
        assert_eq!(
            config.bind_options(),
            BindOptions {
                tools: Some(vec!["calculate_math".into(), "fetch_weather".into()]),
                tool_choice: ToolChoice::Forced("calculate_math".into()),
                parallel_tool_calls: false,
            }
        );
    }

    #[test]
    fn rejects_malformed_file() {
        let err = Config::parse("[backend]\ntemperature = \"hot\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn tool_choice_modes() {
        let mut config = Config::default();
        for (raw, expected) in [
            ("auto", ToolChoice::Auto),
            ("required", ToolChoice::Required),
            ("any", ToolChoice::Required),
            ("search_web", ToolChoice::Forced("search_web".into())),
        ] {
            config.chat.tool_choice = raw.to_string();
            assert_eq!(config.tool_choice(), expected, "{raw}");
        }
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::parse(
            r#"
            [backend]
            model = "from-file"
            api_key = "file-key"
            "#,
        )
        .unwrap();

        config.apply_env_with(env(&[
            ("GROQ_API_KEY", "env-key"),
            ("GROQ_MODEL", "from-env"),
            ("GROQ_TEMPERATURE", "0.9"),
        ]));

        assert_eq!(config.api_key(), Some("env-key"));
        assert_eq!(config.backend.model, "from-env");
        assert_eq!(config.backend.temperature, 0.9);
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut config = Config::default();
        config.backend.api_key = Some("file-key".into());

        config.apply_env_with(env(&[("GROQ_API_KEY", "  "), ("GROQ_MODEL", "")]));

        assert_eq!(config.api_key(), Some("file-key"));
        assert_eq!(config.backend.model, DEFAULT_MODEL);
    }

    #[test]
    fn invalid_temperature_keeps_configured_value() {
        let mut config = Config::parse("[backend]\ntemperature = 0.7").unwrap();

        config.apply_env_with(env(&[("GROQ_TEMPERATURE", "warm")]));

        assert_eq!(config.backend.temperature, 0.7);
    }

    #[test]
    fn disabled_tools_ignore_tool_selection() {
        let mut config = Config::parse(
            r#"
            [chat]
            use_tools = false
            tools = ["retired_tool"]
            tool_choice = "required"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_options(), BindOptions::default());

        config.chat.use_tools = true;
        assert_eq!(config.bind_options().tools, Some(vec!["retired_tool".into()]));
    }

    #[test]
    fn missing_or_blank_api_key() {
        let mut config = Config::default();
        assert_eq!(config.api_key(), None);
        config.backend.api_key = Some(" ".into());
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn command_line_overrides_win() {
        let mut config = Config::default();
        config.apply_env_with(env(&[("GROQ_MODEL", "from-env")]));

        config.apply_overrides(
            Some("from-flag".into()),
            Some(0.0),
            Some("You are a pirate.".into()),
        );

        assert_eq!(config.backend.model, "from-flag");
        assert_eq!(config.backend.temperature, 0.0);
        assert_eq!(config.chat.system_prompt, "You are a pirate.");
    }
}
