use crate::core::podcast::{GenerationRequest, ScriptRecord};
use crate::services::error::{is_rate_limited, is_transient};
use crate::services::fallback::fallback_record;
use crate::services::llm::{CompletionRequest, LlmClient, LlmConfig};
use crate::services::script::{
    build_prompt, clean_completion, description_prompt, system_prompt, title_prompt,
};
use crate::utils::retry::with_retry;
use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use std::time::Duration;

const TRANSCRIPT_TOKEN_CEILING: u32 = 4000;
const TRANSCRIPT_TOKENS_PER_MINUTE: u32 = 200;
const TRANSCRIPT_TEMPERATURE: f32 = 0.8;
const TITLE_MAX_TOKENS: u32 = 100;
const DESCRIPTION_MAX_TOKENS: u32 = 150;
const SUMMARY_TEMPERATURE: f32 = 0.7;

pub fn transcript_max_tokens(duration_minutes: u32) -> u32 {
    duration_minutes
        .saturating_mul(TRANSCRIPT_TOKENS_PER_MINUTE)
        .min(TRANSCRIPT_TOKEN_CEILING)
}

/// Turns a [`GenerationRequest`] into a [`ScriptRecord`] using the text
/// service, or the canned fallback when the service fails.
pub struct ScriptRequester {
    llm: Box<dyn LlmClient>,
    retry_count: usize,
    retry_delay: Duration,
}

impl ScriptRequester {
    pub fn new(llm: Box<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            llm,
            retry_count: config.retry_count,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
        }
    }

    pub fn without_retry(llm: Box<dyn LlmClient>) -> Self {
        Self {
            llm,
            retry_count: 0,
            retry_delay: Duration::ZERO,
        }
    }

    /// Always yields a record. Any upstream failure, including quota
    /// exhaustion, is logged and replaced by the fallback script.
    pub async fn generate_script(&self, request: &GenerationRequest) -> ScriptRecord {
        match self.try_generate(request).await {
            Ok(record) => record,
            Err(e) => {
                if is_rate_limited(&e) {
                    warn!("Text service quota exceeded. Using fallback script instead.");
                } else {
                    error!("Error generating podcast script: {:#}", e);
                }
                fallback_record(request)
            }
        }
    }

    async fn try_generate(&self, request: &GenerationRequest) -> Result<ScriptRecord> {
        let speakers = request.speaker_names();

        let transcript_request = CompletionRequest::new(
            build_prompt(request, &speakers),
            transcript_max_tokens(request.duration_minutes()),
            TRANSCRIPT_TEMPERATURE,
        )
        .with_system(system_prompt());
        let title_request =
            CompletionRequest::new(title_prompt(request), TITLE_MAX_TOKENS, SUMMARY_TEMPERATURE);
        let description_request = CompletionRequest::new(
            description_prompt(request),
            DESCRIPTION_MAX_TOKENS,
            SUMMARY_TEMPERATURE,
        );

        info!(
            "Requesting {}-minute script on '{}' for {} speaker(s)",
            request.duration_minutes(),
            request.topic(),
            speakers.len()
        );

        let (transcript, title, description) = tokio::try_join!(
            self.complete("transcript", &transcript_request),
            self.complete("title", &title_request),
            self.complete("description", &description_request),
        )?;

        let transcript = transcript.trim();
        if transcript.is_empty() {
            bail!("Text service returned an empty transcript");
        }

        let title = match clean_completion(&title) {
            t if t.is_empty() => format!("{}: Expert Discussion", request.topic()),
            t => t,
        };
        let description = match clean_completion(&description) {
            d if d.is_empty() => format!(
                "An engaging discussion about {} with expert insights and analysis.",
                request.topic().to_lowercase()
            ),
            d => d,
        };

        Ok(ScriptRecord::new(request, title, description, transcript.to_string()))
    }

    async fn complete(&self, label: &str, request: &CompletionRequest) -> Result<String> {
        with_retry(label, self.retry_count, self.retry_delay, is_transient, || {
            self.llm.complete(request)
        })
        .await
        .with_context(|| format!("{} completion failed", label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ApiError;
    use crate::services::fallback::{fallback_descriptions, fallback_titles};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy)]
    enum Mode {
        Ok,
        EmptySummaries,
        FailAll,
        RateLimited,
        FailTitleOnce,
    }

    #[derive(Debug)]
    struct MockLlmClient {
        mode: Mode,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl MockLlmClient {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            let seen = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests.iter().filter(|r| r.user == request.user).count()
            };
            let is_title = request.user.contains("episode title");
            let is_description = request.user.contains("episode description");

            match self.mode {
                Mode::FailAll => Err(anyhow::anyhow!("connection refused")),
                Mode::RateLimited => Err(ApiError {
                    provider: "OpenAI",
                    status: 429,
                    body: "Rate limit reached".to_string(),
                }
                .into()),
                Mode::FailTitleOnce if is_title && seen == 1 => Err(ApiError {
                    provider: "OpenAI",
                    status: 503,
                    body: "overloaded".to_string(),
                }
                .into()),
                Mode::EmptySummaries if is_title || is_description => Ok("   ".to_string()),
                _ if is_title => Ok("\"The Qubit Question\"".to_string()),
                _ if is_description => Ok("Two minds on quantum hardware.".to_string()),
                _ => Ok("[Lex Fridman]: Welcome.\n\n[Speaker 2]: Thanks.".to_string()),
            }
        }
    }

    fn request(duration: &str) -> GenerationRequest {
        GenerationRequest::new(
            "Quantum Computing",
            "State of the hardware.",
            vec![
                "Lex Fridman style - Thoughtful".to_string(),
                "Subject matter expert with deep knowledge".to_string(),
            ],
            duration,
            "Interview Style",
        )
        .unwrap()
    }

    #[test]
    fn test_transcript_token_budget() {
        assert_eq!(transcript_max_tokens(5), 1000);
        assert_eq!(transcript_max_tokens(20), 4000);
        assert_eq!(transcript_max_tokens(30), 4000);
    }

    #[tokio::test]
    async fn test_primary_path_assembles_record() {
        let llm = MockLlmClient::new(Mode::Ok);
        let requests = llm.requests.clone();
        let requester = ScriptRequester::without_retry(Box::new(llm));

        let record = requester.generate_script(&request("15")).await;

        assert_eq!(record.title, "The Qubit Question");
        assert_eq!(record.description, "Two minds on quantum hardware.");
        assert!(record.transcript.starts_with("[Lex Fridman]: Welcome."));
        assert_eq!(record.speakers, vec!["Lex Fridman", "Speaker 2"]);
        assert_eq!(record.duration, "15 minutes");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        let transcript_req = requests.iter().find(|r| r.system.is_some()).unwrap();
        assert_eq!(transcript_req.max_tokens, 3000);
        assert_eq!(transcript_req.temperature, 0.8);
        assert!(requests.iter().any(|r| r.max_tokens == 100));
        assert!(requests.iter().any(|r| r.max_tokens == 150));
    }

    #[tokio::test]
    async fn test_empty_summaries_get_defaults() {
        let requester = ScriptRequester::without_retry(Box::new(MockLlmClient::new(Mode::EmptySummaries)));
        let record = requester.generate_script(&request("5")).await;

        assert_eq!(record.title, "Quantum Computing: Expert Discussion");
        assert_eq!(
            record.description,
            "An engaging discussion about quantum computing with expert insights and analysis."
        );
    }

    #[tokio::test]
    async fn test_total_failure_falls_back() {
        let requester = ScriptRequester::without_retry(Box::new(MockLlmClient::new(Mode::FailAll)));
        let req = request("10");
        let record = requester.generate_script(&req).await;

        assert!(!record.id.is_empty());
        assert!(!record.transcript.is_empty());
        assert_eq!(record.speakers.len(), req.personalities().len());
        assert!(record.transcript.starts_with("[Lex Fridman]:"));
        assert!(fallback_titles("Quantum Computing").contains(&record.title));
        assert!(fallback_descriptions("Quantum Computing").contains(&record.description));
    }

    #[tokio::test]
    async fn test_rate_limit_falls_back_without_retry() {
        let llm = MockLlmClient::new(Mode::RateLimited);
        let requests = llm.requests.clone();
        let requester = ScriptRequester {
            llm: Box::new(llm),
            retry_count: 3,
            retry_delay: Duration::ZERO,
        };

        let record = requester.generate_script(&request("10")).await;

        assert!(!record.transcript.is_empty());
        // One attempt per sub-request at most; quota errors are not retried.
        assert!(requests.lock().unwrap().len() <= 3);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let requester = ScriptRequester {
            llm: Box::new(MockLlmClient::new(Mode::FailTitleOnce)),
            retry_count: 1,
            retry_delay: Duration::ZERO,
        };

        let record = requester.generate_script(&request("10")).await;
        assert_eq!(record.title, "The Qubit Question");
    }
}
