use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::services::auth::SupabaseConfig;
use crate::services::llm::LlmConfig;
use crate::services::tts::openai::OpenAiTtsConfig;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_output")]
    pub output_folder: String,

    /// Skip interactive confirmations (audio rendering is done unasked).
    #[serde(default)]
    pub unattended: bool,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_folder: default_output(),
            unattended: false,
            llm: LlmConfig::default(),
            audio: AudioConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    #[serde(default = "default_tts_provider")]
    pub provider: String,

    /// Chunks synthesized at once. 1 keeps requests strictly sequential.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_retry_count")]
    pub retry_count: usize,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    pub openai: Option<OpenAiTtsConfig>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            provider: default_tts_provider(),
            max_concurrency: default_max_concurrency(),
            retry_count: default_retry_count(),
            retry_delay_seconds: default_retry_delay(),
            timeout_seconds: default_timeout(),
            openai: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthConfig {
    pub supabase: Option<SupabaseConfig>,
}

fn default_output() -> String {
    "output".to_string()
}
fn default_tts_provider() -> String {
    "openai".to_string()
}
fn default_max_concurrency() -> usize {
    1
}
pub(crate) fn default_retry_count() -> usize {
    3
}
pub(crate) fn default_retry_delay() -> u64 {
    10
}
pub(crate) fn default_timeout() -> u64 {
    60
}

/// Uses the configured key, or the named environment variable when the
/// config leaves it blank.
pub fn resolve_api_key(configured: &str, env_var: &str) -> Result<String> {
    if !configured.trim().is_empty() {
        return Ok(configured.trim().to_string());
    }
    std::env::var(env_var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .with_context(|| format!("No API key configured and {} is not set", env_var))
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("{} not found. Please create one.", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.output_folder)?;
        Ok(())
    }
}
