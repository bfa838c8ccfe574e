use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_SPEAKERS: usize = 4;

/// Marker that separates a named host from the rest of a personality
/// template, e.g. `"Lex Fridman style - Thoughtful, technical"`.
const STYLE_MARKER: &str = " style";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Please select or enter a topic")]
    EmptyTopic,
    #[error("Please add at least one personality")]
    NoPersonalities,
    #[error("At most 4 personalities are supported, got {0}")]
    TooManyPersonalities(usize),
    #[error("Duration must be a positive number of minutes, got '{0}'")]
    InvalidDuration(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PodcastStyle {
    #[default]
    #[serde(rename = "Joe Rogan Style")]
    JoeRogan,
    #[serde(rename = "NPR Style")]
    Npr,
    #[serde(rename = "TED Talk Style")]
    TedTalk,
    #[serde(rename = "Comedy Podcast Style")]
    Comedy,
    #[serde(rename = "Interview Style")]
    Interview,
    #[serde(rename = "Debate Style")]
    Debate,
}

impl PodcastStyle {
    pub const ALL: [PodcastStyle; 6] = [
        PodcastStyle::JoeRogan,
        PodcastStyle::Npr,
        PodcastStyle::TedTalk,
        PodcastStyle::Comedy,
        PodcastStyle::Interview,
        PodcastStyle::Debate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PodcastStyle::JoeRogan => "Joe Rogan Style",
            PodcastStyle::Npr => "NPR Style",
            PodcastStyle::TedTalk => "TED Talk Style",
            PodcastStyle::Comedy => "Comedy Podcast Style",
            PodcastStyle::Interview => "Interview Style",
            PodcastStyle::Debate => "Debate Style",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PodcastStyle::JoeRogan => {
                "Long-form conversational, curious questioning, deep dives into topics"
            }
            PodcastStyle::Npr => "Professional journalism, well-researched, balanced perspectives",
            PodcastStyle::TedTalk => {
                "Educational, inspiring, expert insights with actionable takeaways"
            }
            PodcastStyle::Comedy => {
                "Light-hearted discussion with humor, entertaining while informative"
            }
            PodcastStyle::Interview => "Structured Q&A format with expert guests and deep expertise",
            PodcastStyle::Debate => {
                "Multiple perspectives, constructive disagreement, balanced arguments"
            }
        }
    }

    pub fn characteristics(&self) -> &'static str {
        match self {
            PodcastStyle::JoeRogan => "Casual, inquisitive, philosophical tangents",
            PodcastStyle::Npr => "Informative, authoritative, structured storytelling",
            PodcastStyle::TedTalk => "Motivational, expert-driven, solution-focused",
            PodcastStyle::Comedy => "Funny, relatable, casual banter with insights",
            PodcastStyle::Interview => "Professional, focused, expert knowledge sharing",
            PodcastStyle::Debate => "Analytical, challenging, multiple viewpoints",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for PodcastStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated inputs for one script generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    topic: String,
    context: String,
    personalities: Vec<String>,
    duration_minutes: u32,
    style: PodcastStyle,
    style_label: String,
}

impl GenerationRequest {
    /// Builds a request from raw form input. Blank personalities are dropped;
    /// an unknown style name resolves to the default style while the label is
    /// kept as typed.
    pub fn new(
        topic: &str,
        context: &str,
        personalities: Vec<String>,
        duration: &str,
        style: &str,
    ) -> Result<Self, RequestError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RequestError::EmptyTopic);
        }

        let personalities: Vec<String> = personalities
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if personalities.is_empty() {
            return Err(RequestError::NoPersonalities);
        }
        if personalities.len() > MAX_SPEAKERS {
            return Err(RequestError::TooManyPersonalities(personalities.len()));
        }

        let duration_minutes = duration
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| RequestError::InvalidDuration(duration.to_string()))?;

        let style_label = match style.trim() {
            "" => PodcastStyle::default().name().to_string(),
            s => s.to_string(),
        };
        let style = PodcastStyle::from_name(&style_label).unwrap_or_default();

        Ok(Self {
            topic: topic.to_string(),
            context: context.trim().to_string(),
            personalities,
            duration_minutes,
            style,
            style_label,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn personalities(&self) -> &[String] {
        &self.personalities
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn style(&self) -> PodcastStyle {
        self.style
    }

    /// The style name as requested, which may not be one of the known styles.
    pub fn style_label(&self) -> &str {
        &self.style_label
    }

    /// One name per personality, in the same order.
    pub fn speaker_names(&self) -> Vec<String> {
        self.personalities
            .iter()
            .enumerate()
            .map(|(i, p)| speaker_name(p, i))
            .collect()
    }
}

/// `"Joe Rogan style - Deep..."` becomes `"Joe Rogan"`; anything without the
/// style marker becomes a positional `"Speaker N"`.
pub fn speaker_name(personality: &str, index: usize) -> String {
    match personality.find(STYLE_MARKER) {
        Some(pos) if !personality[..pos].trim().is_empty() => personality[..pos].trim().to_string(),
        _ => format!("Speaker {}", index + 1),
    }
}

/// A finished script, handed to the caller for display, playback or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub transcript: String,
    pub speakers: Vec<String>,
    pub topic: String,
    pub context: String,
    pub personalities: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ScriptRecord {
    pub fn new(request: &GenerationRequest, title: String, description: String, transcript: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description,
            duration: format!("{} minutes", request.duration_minutes()),
            transcript,
            speakers: request.speaker_names(),
            topic: request.topic().to_string(),
            context: request.context().to_string(),
            personalities: request.personalities().to_vec(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personalities(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_speaker_name_from_style_template() {
        assert_eq!(
            speaker_name("Joe Rogan style - Deep, conversational with curious questioning", 0),
            "Joe Rogan"
        );
        assert_eq!(speaker_name("Subject matter expert with deep knowledge", 1), "Speaker 2");
    }

    #[test]
    fn test_speaker_names_keep_positions() {
        let request = GenerationRequest::new(
            "AI",
            "ctx",
            personalities(&[
                "Expert scientist with deep technical knowledge",
                "Terry Gross style - Professional, warm",
                " style without a name",
            ]),
            "10",
            "NPR Style",
        )
        .unwrap();

        assert_eq!(
            request.speaker_names(),
            vec!["Speaker 1", "Terry Gross", "Speaker 3"]
        );
    }

    #[test]
    fn test_request_validation() {
        let ok = personalities(&["Host"]);
        assert_eq!(
            GenerationRequest::new("  ", "", ok.clone(), "5", "").unwrap_err(),
            RequestError::EmptyTopic
        );
        assert_eq!(
            GenerationRequest::new("AI", "", personalities(&["", "   "]), "5", "").unwrap_err(),
            RequestError::NoPersonalities
        );
        assert_eq!(
            GenerationRequest::new("AI", "", personalities(&["a", "b", "c", "d", "e"]), "5", "")
                .unwrap_err(),
            RequestError::TooManyPersonalities(5)
        );
        assert!(matches!(
            GenerationRequest::new("AI", "", ok.clone(), "abc", ""),
            Err(RequestError::InvalidDuration(_))
        ));
        assert!(matches!(
            GenerationRequest::new("AI", "", ok, "0", ""),
            Err(RequestError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_unknown_style_falls_back_but_keeps_label() {
        let request =
            GenerationRequest::new("AI", "", personalities(&["Host"]), "15", "Late Night Style").unwrap();
        assert_eq!(request.style(), PodcastStyle::JoeRogan);
        assert_eq!(request.style_label(), "Late Night Style");

        let request = GenerationRequest::new("AI", "", personalities(&["Host"]), "15", "ted talk style").unwrap();
        assert_eq!(request.style(), PodcastStyle::TedTalk);

        let request = GenerationRequest::new("AI", "", personalities(&["Host"]), "15", "").unwrap();
        assert_eq!(request.style_label(), "Joe Rogan Style");
    }

    #[test]
    fn test_record_shape() {
        let request = GenerationRequest::new(
            "Space",
            "Mars missions",
            personalities(&["Lex Fridman style - Thoughtful", "Curious interviewer"]),
            "20",
            "Interview Style",
        )
        .unwrap();
        let record = ScriptRecord::new(&request, "T".into(), "D".into(), "[Lex Fridman]: Hi".into());

        assert!(!record.id.is_empty());
        assert_eq!(record.duration, "20 minutes");
        assert_eq!(record.speakers, vec!["Lex Fridman", "Speaker 2"]);
        assert_eq!(record.personalities.len(), record.speakers.len());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("generatedAt").is_some());
    }
}
