use rand::seq::IndexedRandom;

pub struct TopicCategory {
    pub name: &'static str,
    pub topics: &'static [&'static str],
}

pub const TOPIC_CATEGORIES: &[TopicCategory] = &[
    TopicCategory {
        name: "Technology",
        topics: &[
            "Artificial Intelligence and Machine Learning",
            "Blockchain and Cryptocurrency",
            "Cybersecurity and Privacy",
            "Future of Work and Automation",
            "Virtual Reality and Metaverse",
            "Quantum Computing Revolution",
        ],
    },
    TopicCategory {
        name: "Science",
        topics: &[
            "Climate Change and Environmental Solutions",
            "Space Exploration and Astronomy",
            "Biotechnology and Gene Editing",
            "Renewable Energy Technologies",
            "Medical Breakthroughs and Healthcare",
            "Ocean Conservation and Marine Biology",
        ],
    },
    TopicCategory {
        name: "Economics & Business",
        topics: &[
            "Global Economic Trends",
            "Startup Culture and Entrepreneurship",
            "Sustainable Business Practices",
            "Digital Marketing Revolution",
            "Supply Chain Innovation",
            "Financial Technology (FinTech)",
        ],
    },
    TopicCategory {
        name: "Society & Culture",
        topics: &[
            "Social Media Impact on Society",
            "Mental Health Awareness",
            "Education System Reform",
            "Cultural Diversity and Inclusion",
            "Urban Planning and Smart Cities",
            "Food Security and Agriculture",
        ],
    },
];

pub const HOST_TEMPLATES: &[&str] = &[
    "Joe Rogan style - Deep, conversational with curious questioning and casual exploration",
    "Lex Fridman style - Thoughtful, technical, with philosophical undertones",
    "Tim Ferriss style - Analytical, detailed, focused on extracting actionable insights",
    "Sam Harris style - Philosophical, measured, with deep intellectual discourse",
    "Alex Cooper style - Energetic, engaging, with modern cultural insights",
    "Dax Shepard style - Casual, humorous, with personal anecdotes and empathy",
    "Marc Maron style - Intense, personal, with deep emotional exploration",
    "Terry Gross style - Professional, warm, with masterful interviewing",
    "Guy Raz style - Narrative-driven, engaging storytelling with business focus",
    "Ezra Klein style - Analytical, policy-focused, with structured discussion",
];

pub const EXPERT_PERSONALITIES: &[&str] = &[
    "Curious interviewer who asks probing questions",
    "Expert scientist with deep technical knowledge",
    "Skeptical journalist who challenges assumptions",
    "Enthusiastic advocate for the topic",
    "Practical business executive with real-world experience",
    "Academic researcher with theoretical insights",
    "Industry veteran with historical perspective",
    "Young innovator with fresh ideas",
    "Policy maker focused on regulations and ethics",
    "Consumer advocate representing public interests",
];

pub const DURATIONS: &[&str] = &["5", "10", "15", "20", "30"];
pub const DEFAULT_DURATION: &str = "15";

pub fn default_personalities() -> Vec<String> {
    vec![
        HOST_TEMPLATES[0].to_string(),
        "Subject matter expert with deep knowledge".to_string(),
    ]
}

/// Short label shown for a host template, e.g. `"Lex Fridman"`.
pub fn template_label(template: &str) -> &str {
    template.split(" style").next().unwrap_or(template)
}

/// Picks one of the canned context paragraphs for `topic`.
pub fn suggest_context(topic: &str) -> String {
    let topic = topic.to_lowercase();
    let suggestions = [
        format!("Explore the latest developments in {topic}, discussing current trends, challenges, and future implications for society and industry."),
        format!("Dive deep into {topic} from multiple perspectives, examining both opportunities and potential risks while providing actionable insights."),
        format!("Analyze the impact of {topic} on everyday life, featuring expert opinions, real-world examples, and practical applications."),
        format!("Investigate the cutting-edge research and innovations in {topic}, discussing breakthrough discoveries and their potential to transform our world."),
    ];
    let mut rng = rand::rng();
    suggestions
        .choose(&mut rng)
        .cloned()
        .unwrap_or_default()
}
