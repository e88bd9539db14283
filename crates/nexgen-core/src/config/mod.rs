use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NexgenError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NexgenConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub web: WebConfig,
}

/// The hosted persistence backend (Supabase project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// "supabase" or "memory" (in-process, for development and tests).
    #[serde(default = "default_backend_kind")]
    pub kind: String,
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// The project's anon key. Also settable via `NEXGEN_BACKEND_KEY`.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_projects_table")]
    pub projects_table: String,
    #[serde(default = "default_reservations_table")]
    pub reservations_table: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_kind(),
            url: default_backend_url(),
            key: None,
            projects_table: default_projects_table(),
            reservations_table: default_reservations_table(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// AI features (briefing, chat) are off unless enabled here.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Override the environment variable consulted for the API key.
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: None,
            base_url: None,
            env_var: None,
            max_tokens: default_llm_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_web_host")]
    pub host: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            host: default_web_host(),
        }
    }
}

/// Valid backend kinds.
pub const VALID_BACKENDS: &[&str] = &["supabase", "memory"];

/// Valid LLM provider names.
pub const VALID_LLM_PROVIDERS: &[&str] = &["gemini", "openai", "ollama"];

// -- Defaults --

fn default_backend_kind() -> String {
    "supabase".to_string()
}
fn default_backend_url() -> String {
    // local supabase dev stack
    "http://localhost:54321".to_string()
}
fn default_projects_table() -> String {
    "projects".to_string()
}
fn default_reservations_table() -> String {
    "reservations".to_string()
}
fn default_llm_provider() -> String {
    "gemini".to_string()
}
fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_llm_max_tokens() -> usize {
    1024
}
fn default_web_port() -> u16 {
    8787
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

impl NexgenConfig {
    /// Load configuration with a three-layer TOML merge:
    /// 1. ~/.config/nexgen/config.toml (global)
    /// 2. .nexgen/config.toml (project)
    /// 3. .nexgen/config.local.toml (local, gitignored)
    ///
    /// `NEXGEN_BACKEND_URL` and `NEXGEN_BACKEND_KEY` override the file
    /// values afterwards; secrets usually arrive that way.
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".nexgen").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
            let local_config = dir.join(".nexgen").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| NexgenError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| NexgenError::Config(e.to_string()))?;

        cfg.apply_env();
        cfg.validate();
        Ok(cfg)
    }

    /// Defaults only, no files and no environment.
    pub fn default_config() -> Self {
        Self::default()
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("NEXGEN_BACKEND_URL") {
            if !url.is_empty() {
                self.backend.url = url;
            }
        }
        if let Ok(key) = std::env::var("NEXGEN_BACKEND_KEY") {
            if !key.is_empty() {
                self.backend.key = Some(key);
            }
        }
    }

    /// Validate config values, fixing what can be fixed and logging
    /// warnings. Lenient on purpose: a misconfigured dashboard should
    /// still start and show its connection status.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !VALID_BACKENDS.contains(&self.backend.kind.as_str()) {
            warnings.push(format!(
                "unknown backend kind '{}', valid: {}",
                self.backend.kind,
                VALID_BACKENDS.join(", ")
            ));
        }

        if self.backend.kind == "supabase" && self.backend.key.is_none() {
            warnings.push(
                "backend.key is not set (and NEXGEN_BACKEND_KEY is empty); requests will be rejected"
                    .to_string(),
            );
        }

        if self.llm.enabled && !VALID_LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            warnings.push(format!(
                "unknown LLM provider '{}', valid: {}",
                self.llm.provider,
                VALID_LLM_PROVIDERS.join(", ")
            ));
        }

        if self.llm.max_tokens == 0 {
            warnings.push("llm.max_tokens = 0, setting to 256".to_string());
            self.llm.max_tokens = 256;
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nexgen").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NexgenConfig::default_config();
        assert_eq!(config.backend.kind, "supabase");
        assert_eq!(config.backend.url, "http://localhost:54321");
        assert_eq!(config.backend.projects_table, "projects");
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.web.port, 8787);
        assert_eq!(config.web.host, "127.0.0.1");
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[backend]
kind = "supabase"
url = "https://abc.supabase.co"
key = "anon-key"

[llm]
enabled = true
model = "gemini-2.0-flash"
max_tokens = 2048

[web]
port = 9000
"#;
        let config: NexgenConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.url, "https://abc.supabase.co");
        assert_eq!(config.backend.key.as_deref(), Some("anon-key"));
        assert!(config.llm.enabled);
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.web.port, 9000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: NexgenConfig = toml::from_str("[llm]\nenabled = true\n").unwrap();
        assert_eq!(config.backend.kind, "supabase");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.max_tokens, 1024);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = NexgenConfig::default_config();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: NexgenConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.kind, config.backend.kind);
        assert_eq!(parsed.web.port, config.web.port);
    }

    #[test]
    fn test_load_config_no_files() {
        let config = NexgenConfig::load(Some(Path::new("/nonexistent/path"))).unwrap();
        assert_eq!(config.backend.projects_table, "projects");
    }

    #[test]
    fn test_validate_missing_key_warns() {
        let mut config = NexgenConfig::default_config();
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("backend.key")));
    }

    #[test]
    fn test_validate_unknown_backend() {
        let mut config = NexgenConfig::default_config();
        config.backend.kind = "banana".to_string();
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("unknown backend kind")));
    }

    #[test]
    fn test_validate_unknown_llm_provider_only_when_enabled() {
        let mut config = NexgenConfig::default_config();
        config.llm.provider = "banana".to_string();
        assert!(!config.validate().iter().any(|w| w.contains("LLM provider")));
        config.llm.enabled = true;
        assert!(config.validate().iter().any(|w| w.contains("LLM provider")));
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let mut config = NexgenConfig::default_config();
        config.backend.key = Some("k".into());
        config.llm.max_tokens = 0;
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("max_tokens")));
        assert_eq!(config.llm.max_tokens, 256);
    }

}
