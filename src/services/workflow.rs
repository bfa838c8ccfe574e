use crate::core::config::Config;
use crate::core::io::Storage;
use crate::core::podcast::{GenerationRequest, ScriptRecord};
use crate::services::export::Exporter;
use crate::services::generator::ScriptRequester;
use crate::services::llm::LlmClient;
use crate::services::synthesis::{AudioAsset, AudioRequester};
use crate::services::tts::TtsClient;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::sync::Arc;

/// Paths written for one episode.
#[derive(Debug, Clone)]
pub struct EpisodeOutput {
    pub record: ScriptRecord,
    pub transcript_path: String,
    pub record_path: String,
    pub audio_path: Option<String>,
}

pub struct WorkflowManager {
    config: Config,
    scripts: ScriptRequester,
    audio: AudioRequester,
    storage: Arc<dyn Storage>,
}

impl WorkflowManager {
    pub fn new(
        config: Config,
        llm: Box<dyn LlmClient>,
        tts: Box<dyn TtsClient>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({eta})")?
                .progress_chars("#>-"),
        );

        let scripts = ScriptRequester::new(llm, &config.llm);
        let audio = AudioRequester::new(tts, &config.audio).with_progress(pb);

        Ok(Self {
            config,
            scripts,
            audio,
            storage,
        })
    }

    /// Generates the script, exports it, then renders audio if asked to.
    /// An audio failure is reported but keeps the exported transcript.
    pub async fn run(&self, request: &GenerationRequest) -> Result<EpisodeOutput> {
        println!("Generating script for \"{}\"...", request.topic());
        let record = self.scripts.generate_script(request).await;
        print_record(&record);

        let exporter = Exporter::new(self.storage.as_ref(), self.config.output_folder.clone());
        let transcript_path = exporter.export_transcript(&record).await?;
        let record_path = exporter.export_record(&record).await?;
        println!("Transcript saved: {}", transcript_path);

        let mut audio_path = None;
        if self.wants_audio()? {
            if let Some(audio) = self.render_audio(&record).await {
                let path = exporter.export_audio(&record, &audio).await?;
                println!("Audio saved: {}", path);
                audio_path = Some(path);
            }
        }

        Ok(EpisodeOutput {
            record,
            transcript_path,
            record_path,
            audio_path,
        })
    }

    fn wants_audio(&self) -> Result<bool> {
        if self.config.unattended {
            return Ok(true);
        }
        let ans = inquire::Confirm::new("Generate audio for this episode?")
            .with_default(true)
            .prompt()?;
        Ok(ans)
    }

    /// Renders the transcript in the first personality's voice. Ctrl-C
    /// abandons the pending requests.
    async fn render_audio(&self, record: &ScriptRecord) -> Option<AudioAsset> {
        let personality = record.personalities.first().map(String::as_str);
        println!("Generating audio (Ctrl-C to cancel)...");

        tokio::select! {
            res = self.audio.synthesize(&record.transcript, personality) => match res {
                Ok(audio) => {
                    info!("Audio ready: {} bytes", audio.bytes.len());
                    Some(audio)
                }
                Err(e) => {
                    eprintln!("{}", e);
                    None
                }
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Audio generation cancelled by user");
                println!("Audio generation cancelled.");
                None
            }
        }
    }
}

fn print_record(record: &ScriptRecord) {
    println!();
    println!("{}", record.title);
    println!("{}", record.description);
    println!("{} | Speakers: {}", record.duration, record.speakers.join(", "));
    println!();
    println!("{}", record.transcript);
    println!();
}
