use crate::core::config::resolve_api_key;
use crate::services::error::ApiError;
use crate::services::tts::{SpeechRequest, TtsClient, DEFAULT_MAX_INPUT_CHARS};
use crate::utils::audio::AudioFormat;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

// --- Config ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAiTtsConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub format: AudioFormat,
    pub base_url: Option<String>,
}

impl Default for OpenAiTtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            format: AudioFormat::default(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "tts-1-hd".to_string()
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
    speed: f32,
}

// --- Client ---

pub struct OpenAiTtsClient {
    api_key: String,
    model: String,
    format: AudioFormat,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiTtsClient {
    pub fn new(config: OpenAiTtsConfig, client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            api_key: resolve_api_key(&config.api_key, "OPENAI_API_KEY")?,
            model: config.model,
            format: config.format,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or("https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }
}

#[async_trait]
impl TtsClient for OpenAiTtsClient {
    async fn speak(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        if request.input.chars().count() > DEFAULT_MAX_INPUT_CHARS {
            debug!(
                "Sending {} chars, above the documented {} limit",
                request.input.chars().count(),
                DEFAULT_MAX_INPUT_CHARS
            );
        }

        let url = format!("{}/audio/speech", self.base_url);
        let body = SpeechBody {
            model: &self.model,
            voice: request.voice.as_str(),
            input: &request.input,
            response_format: request.format.as_str(),
            speed: request.speed,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::from_response("OpenAI", resp).await.into());
        }

        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(anyhow!("OpenAI speech response was empty"));
        }
        Ok(audio.to_vec())
    }

    fn format(&self) -> AudioFormat {
        self.format
    }
}
