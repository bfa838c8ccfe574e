//! Canned scripts used when the text service cannot be reached.

use crate::core::podcast::{GenerationRequest, PodcastStyle, ScriptRecord};
use rand::seq::IndexedRandom;

pub fn fallback_titles(topic: &str) -> [String; 6] {
    [
        format!("Deep Dive: {topic}"),
        format!("Understanding {topic}: Expert Insights"),
        format!("The Future of {topic}"),
        format!("{topic}: What You Need to Know"),
        format!("Exploring {topic} with Industry Leaders"),
        format!("{topic} Unpacked: A Comprehensive Discussion"),
    ]
}

pub fn fallback_title(topic: &str) -> String {
    pick(&fallback_titles(topic))
}

/// The topic is lowercased inside the sentence.
pub fn fallback_descriptions(topic: &str) -> [String; 4] {
    let topic = topic.to_lowercase();
    [
        format!("Join our expert panel as they dive deep into {topic}, exploring its implications and future potential."),
        format!("An insightful discussion about {topic} featuring industry experts and thought leaders."),
        format!("Discover the latest trends and developments in {topic} through engaging expert conversation."),
        format!("Our hosts break down the complexities of {topic} in this comprehensive discussion."),
    ]
}

pub fn fallback_description(topic: &str) -> String {
    pick(&fallback_descriptions(topic))
}

fn pick(options: &[String]) -> String {
    let mut rng = rand::rng();
    options.choose(&mut rng).cloned().unwrap_or_default()
}

struct Dialogue {
    opening: String,
    response: String,
    followup: String,
    insight: String,
    conclusion: String,
}

fn dialogue(style: PodcastStyle, host: &str, guest: &str, topic: &str, context: &str) -> Dialogue {
    match style {
        PodcastStyle::Npr => {
            let first_name = host.split(' ').next().unwrap_or(host);
            Dialogue {
                opening: format!("[{host}]: I'm {first_name}, and this is our discussion on {topic}. {context}"),
                response: format!("[{guest}]: Thank you for having me. This is indeed a critical issue that deserves our attention."),
                followup: format!("[{host}]: Can you help our listeners understand why this matters right now?"),
                insight: format!("[{guest}]: Certainly. The research shows several key factors at play here..."),
                conclusion: format!("[{host}]: Thank you for this enlightening conversation about {topic}."),
            }
        }
        PodcastStyle::TedTalk => Dialogue {
            opening: format!("[{host}]: Welcome to today's exploration of {topic}. {context} What if I told you this could change everything?"),
            response: format!("[{guest}]: That's exactly the mindset we need. This isn't just theory - it's actionable insight that can transform how we approach this challenge."),
            followup: format!("[{host}]: What's the first step people can take today?"),
            insight: format!("[{guest}]: Here's what I've learned from working with hundreds of organizations..."),
            conclusion: format!("[{host}]: The future starts with understanding. Thank you for joining us on this journey."),
        },
        // Styles without their own skeleton reuse the conversational one.
        _ => Dialogue {
            opening: format!("[{host}]: Alright, we're live! Today we're diving into {topic}, and man, this is something I've been thinking about a lot lately. {context}"),
            response: format!("[{guest}]: Dude, absolutely! You know what's crazy about this? Most people don't realize how deep this rabbit hole goes."),
            followup: format!("[{host}]: That's exactly what I'm talking about! It's like, when you really start looking into it, everything connects, you know?"),
            insight: format!("[{guest}]: One hundred percent. And here's the thing that blows my mind..."),
            conclusion: format!("[{host}]: This has been incredible, man. Where can people learn more about this?"),
        },
    }
}

/// Builds a two-voice transcript from the style skeleton. With a single
/// speaker the second part goes to `"Speaker 2"`.
pub fn fallback_transcript(request: &GenerationRequest, speakers: &[String]) -> String {
    let host = speakers.first().map(String::as_str).unwrap_or("Speaker 1");
    let guest = speakers.get(1).map(String::as_str).unwrap_or("Speaker 2");
    let d = dialogue(request.style(), host, guest, request.topic(), request.context());

    let lines = [
        d.opening,
        d.response,
        d.followup,
        d.insight,
        format!("[{host}]: That's fascinating. How do you see this evolving over the next few years?"),
        format!("[{guest}]: Well, based on current trends and what we're seeing in the research, I think we're at a pivotal moment. The next 2-3 years will be crucial."),
        format!("[{host}]: What should people be watching for?"),
        format!("[{guest}]: The key indicators are going to be adoption rates, regulatory responses, and how quickly the technology matures. These will tell us everything we need to know about the trajectory."),
        format!("[{host}]: Any final thoughts for our listeners?"),
        format!("[{guest}]: Stay curious, stay informed, and don't be afraid to engage with these concepts. The future belongs to those who understand and adapt."),
        d.conclusion,
        format!("[{guest}]: Thanks for having me. This was a great conversation."),
    ];
    lines.join("\n\n")
}

pub fn fallback_record(request: &GenerationRequest) -> ScriptRecord {
    let speakers = request.speaker_names();
    ScriptRecord::new(
        request,
        fallback_title(request.topic()),
        fallback_description(request.topic()),
        fallback_transcript(request, &speakers),
    )
}
