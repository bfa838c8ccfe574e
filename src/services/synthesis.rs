use crate::core::config::AudioConfig;
use crate::services::error::{is_transient, SynthesisError};
use crate::services::tts::{SpeechRequest, TtsClient};
use crate::services::voice::{select_voice, VoiceConfig, DEFAULT_VOICE};
use crate::utils::audio::{merge_segments, AudioFormat};
use crate::utils::retry::with_retry;
use crate::utils::text::split_text_into_chunks;
use anyhow::{anyhow, Context, Result};
use futures_util::{StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use log::{debug, error, info};
use std::time::Duration;

/// A finished audio render.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioAsset {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

pub struct AudioRequester {
    tts: Box<dyn TtsClient>,
    max_concurrency: usize,
    retry_count: usize,
    retry_delay: Duration,
    progress: Option<ProgressBar>,
}

impl AudioRequester {
    pub fn new(tts: Box<dyn TtsClient>, config: &AudioConfig) -> Self {
        Self {
            tts,
            max_concurrency: config.max_concurrency.max(1),
            retry_count: config.retry_count,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
            progress: None,
        }
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_retry(mut self, retry_count: usize, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }

    /// Ticks once per finished chunk. The length is set when chunking is done.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Renders the whole transcript in one voice. Fails as a unit: a single
    /// failed chunk discards everything rendered so far.
    pub async fn synthesize(
        &self,
        transcript: &str,
        personality: Option<&str>,
    ) -> Result<AudioAsset, SynthesisError> {
        let voice = personality.map(select_voice).unwrap_or(DEFAULT_VOICE);
        match self.render(transcript, voice).await {
            Ok(asset) => Ok(asset),
            Err(e) => {
                error!("Error generating audio: {:#}", e);
                Err(SynthesisError::classify(&e))
            }
        }
    }

    async fn render(&self, transcript: &str, voice: VoiceConfig) -> Result<AudioAsset> {
        let chunks = split_text_into_chunks(transcript, self.tts.max_input_chars());
        if chunks.is_empty() {
            return Err(anyhow!("Transcript is empty, nothing to synthesize"));
        }

        let format = self.tts.format();
        info!(
            "Synthesizing {} chunk(s) with voice {} at {}x",
            chunks.len(),
            voice.voice.as_str(),
            voice.speed
        );
        if let Some(pb) = &self.progress {
            pb.set_length(chunks.len() as u64);
        }

        let tts = self.tts.as_ref();
        let progress = self.progress.as_ref();
        // The first failed chunk ends the stream; nothing further is requested.
        let results: Vec<(usize, Vec<u8>)> = futures_util::stream::iter(chunks.iter().enumerate())
            .map(|(i, chunk)| {
                let request = SpeechRequest {
                    input: chunk.clone(),
                    voice: voice.voice,
                    speed: voice.speed,
                    format,
                };
                async move {
                    let label = format!("Chunk {}", i + 1);
                    let audio = with_retry(&label, self.retry_count, self.retry_delay, is_transient, || {
                        tts.speak(&request)
                    })
                    .await
                    .with_context(|| format!("Failed to synthesize chunk {}", i + 1))?;
                    debug!("Chunk {} done ({} bytes)", i + 1, audio.len());
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    Ok::<_, anyhow::Error>((i, audio))
                }
            })
            .buffer_unordered(self.max_concurrency)
            .try_collect()
            .await?;

        let mut segments = vec![Vec::new(); chunks.len()];
        for (i, audio) in results {
            segments[i] = audio;
        }

        if let Some(pb) = &self.progress {
            pb.finish_with_message("Synthesis complete");
        }

        let bytes = merge_segments(format, &segments)?;
        Ok(AudioAsset { bytes, format })
    }
}
