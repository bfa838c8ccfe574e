use serde::{Deserialize, Serialize};

/// Voices offered by the speech endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    pub voice: Voice,
    pub speed: f32,
}

impl VoiceConfig {
    pub const fn new(voice: Voice, speed: f32) -> Self {
        Self { voice, speed }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        DEFAULT_VOICE
    }
}

pub const DEFAULT_VOICE: VoiceConfig = VoiceConfig::new(Voice::Alloy, 1.0);

// Order matters: named hosts are checked before generic role words, so
// "Lex Fridman style - host" resolves to Lex Fridman, not "host".
const VOICE_TABLE: &[(&[&str], VoiceConfig)] = &[
    (&["joe rogan"], VoiceConfig::new(Voice::Onyx, 1.1)),
    (&["lex fridman"], VoiceConfig::new(Voice::Onyx, 0.9)),
    (&["tim ferriss"], VoiceConfig::new(Voice::Echo, 1.0)),
    (&["sam harris"], VoiceConfig::new(Voice::Fable, 0.95)),
    (&["alex cooper"], VoiceConfig::new(Voice::Nova, 1.1)),
    (&["dax shepard"], VoiceConfig::new(Voice::Echo, 1.15)),
    (&["marc maron"], VoiceConfig::new(Voice::Echo, 1.2)),
    (&["terry gross"], VoiceConfig::new(Voice::Nova, 0.95)),
    (&["guy raz"], VoiceConfig::new(Voice::Fable, 1.0)),
    (&["ezra klein"], VoiceConfig::new(Voice::Echo, 1.05)),
    (&["scientist", "researcher"], VoiceConfig::new(Voice::Echo, 0.95)),
    (&["journalist"], VoiceConfig::new(Voice::Fable, 1.0)),
    (&["expert", "executive"], VoiceConfig::new(Voice::Onyx, 1.0)),
    (&["interviewer"], VoiceConfig::new(Voice::Echo, 1.0)),
    (&["host"], VoiceConfig::new(Voice::Fable, 1.0)),
];

/// Picks a voice for a free-text personality. Never fails; unmatched input
/// gets [`DEFAULT_VOICE`].
pub fn select_voice(personality: &str) -> VoiceConfig {
    let personality = personality.to_lowercase();
    VOICE_TABLE
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| personality.contains(p)))
        .map(|(_, config)| *config)
        .unwrap_or(DEFAULT_VOICE)
}
