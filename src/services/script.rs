use crate::core::podcast::{GenerationRequest, PodcastStyle};

pub const WORDS_PER_MINUTE: u32 = 150;

const SYSTEM_PROMPT: &str = "You are an expert podcast script writer who creates engaging, \
natural-sounding conversations between multiple speakers. Your transcripts should feel authentic \
and capture the essence of real podcast discussions.";

// Tone directive per style. Unknown styles never reach this table; they
// resolve to the default style when the request is built.
const STYLE_INSTRUCTIONS: &[(PodcastStyle, &str)] = &[
    (
        PodcastStyle::JoeRogan,
        "Create a conversational, long-form discussion with curious questioning, philosophical tangents, \
and casual but deep exploration of topics. Use \"dude\", \"man\", and casual language. Include moments \
of wonder and genuine curiosity.",
    ),
    (
        PodcastStyle::Npr,
        "Create a professional, well-researched discussion with balanced perspectives, structured \
storytelling, and authoritative but accessible language. Focus on informative content with clear \
explanations.",
    ),
    (
        PodcastStyle::TedTalk,
        "Create an educational, inspiring discussion with expert insights, actionable takeaways, and \
motivational language. Focus on solutions and positive outcomes.",
    ),
    (
        PodcastStyle::Comedy,
        "Create a light-hearted discussion with humor, entertaining banter, and funny observations while \
still being informative. Include jokes and casual commentary.",
    ),
    (
        PodcastStyle::Interview,
        "Create a structured Q&A format with focused questions, expert responses, and professional \
dialogue. Maintain clear interviewer-interviewee dynamics.",
    ),
    (
        PodcastStyle::Debate,
        "Create a discussion with multiple perspectives, constructive disagreement, and balanced \
arguments. Include challenging questions and different viewpoints.",
    ),
];

pub fn style_instruction(style: PodcastStyle) -> &'static str {
    STYLE_INSTRUCTIONS
        .iter()
        .find(|(s, _)| *s == style)
        .or_else(|| STYLE_INSTRUCTIONS.first())
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

pub fn target_word_count(duration_minutes: u32) -> u32 {
    duration_minutes.saturating_mul(WORDS_PER_MINUTE)
}

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// The transcript instruction. `speakers[i]` is paired with personality `i`.
pub fn build_prompt(request: &GenerationRequest, speakers: &[String]) -> String {
    let speaker_lines = speakers
        .iter()
        .zip(request.personalities())
        .map(|(name, personality)| format!("- {}: {}", name, personality))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Generate a {duration}-minute podcast transcript in the style of \"{style}\".\n\
        \n\
        TOPIC: {topic}\n\
        \n\
        CONTEXT: {context}\n\
        \n\
        SPEAKERS:\n\
        {speaker_lines}\n\
        \n\
        STYLE INSTRUCTIONS: {instruction}\n\
        \n\
        REQUIREMENTS:\n\
        1. Create natural, engaging dialogue between the speakers\n\
        2. Include speaker names in brackets like [Speaker Name]:\n\
        3. Make the conversation feel authentic and spontaneous\n\
        4. Include appropriate reactions, questions, and follow-ups\n\
        5. Ensure the content is informative and engaging\n\
        6. Target approximately {words} words ({wpm} words per minute)\n\
        7. Include natural conversation elements like \"um\", \"you know\", laughter, etc.\n\
        8. Make sure each speaker has a distinct voice and perspective\n\
        9. Cover the topic comprehensively within the time limit\n\
        10. End with a natural conclusion\n\
        \n\
        Generate the complete transcript now:",
        duration = request.duration_minutes(),
        style = request.style_label(),
        topic = request.topic(),
        context = request.context(),
        speaker_lines = speaker_lines,
        instruction = style_instruction(request.style()),
        words = target_word_count(request.duration_minutes()),
        wpm = WORDS_PER_MINUTE,
    )
}

pub fn title_prompt(request: &GenerationRequest) -> String {
    format!(
        "Generate a compelling podcast episode title for a {} discussion about \"{}\". \
        Make it engaging and clickable. Return only the title, no quotes.",
        request.style_label(),
        request.topic()
    )
}

pub fn description_prompt(request: &GenerationRequest) -> String {
    format!(
        "Generate a compelling 1-2 sentence podcast episode description for a discussion about \"{}\" in {}. \
        Make it engaging and informative. Return only the description.",
        request.topic(),
        request.style_label()
    )
}

/// Trims model output and removes code fences and wrapping quotes that
/// models add despite being told not to.
pub fn clean_completion(s: &str) -> String {
    let s = s.trim();
    let s = if s.starts_with("```") {
        s.trim_start_matches("```")
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim_end_matches("```")
            .trim()
    } else {
        s
    };

    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if s.len() > 1 && s.starts_with(open) && s.ends_with(close) {
            return s[open.len_utf8()..s.len() - close.len_utf8()].trim().to_string();
        }
    }
    s.to_string()
}
