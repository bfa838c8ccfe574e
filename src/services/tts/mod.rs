use crate::core::config::AudioConfig;
use crate::services::voice::Voice;
use crate::utils::audio::AudioFormat;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use std::time::Duration;

pub mod openai;

/// Largest input the speech endpoint accepts in one call.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub input: String,
    pub voice: Voice,
    pub speed: f32,
    pub format: AudioFormat,
}

#[async_trait]
pub trait TtsClient: Send + Sync {
    /// Synthesizes one piece of text, at most [`TtsClient::max_input_chars`]
    /// long, and returns the encoded audio.
    async fn speak(&self, request: &SpeechRequest) -> Result<Vec<u8>>;

    fn max_input_chars(&self) -> usize {
        DEFAULT_MAX_INPUT_CHARS
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }
}

pub fn create_tts_client(config: &AudioConfig) -> Result<Box<dyn TtsClient>> {
    info!("Initializing TTS Client for provider: {}", config.provider);
    match config.provider.as_str() {
        "openai" => {
            let openai_config = config.openai.clone().unwrap_or_default();
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .context("Failed to build HTTP client")?;
            Ok(Box::new(openai::OpenAiTtsClient::new(openai_config, http)?))
        }
        _ => Err(anyhow!("Unknown TTS provider: {}", config.provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider() {
        let config = AudioConfig {
            provider: "edge-tts".to_string(),
            ..Default::default()
        };
        assert!(create_tts_client(&config).is_err());
    }

    #[test]
    fn test_openai_provider_with_configured_key() {
        let config = AudioConfig {
            openai: Some(openai::OpenAiTtsConfig {
                api_key: "sk-test".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let client = create_tts_client(&config).unwrap();
        assert_eq!(client.max_input_chars(), 4096);
        assert_eq!(client.format(), AudioFormat::Mp3);
    }
}
