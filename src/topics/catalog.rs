//! Curated learning metadata for well-known topics.

use crate::catalog::normalize_key;
use crate::types::Audience;

struct CuratedTopic {
    key: &'static str,
    objectives: [&'static str; 4],
    difficulty: Audience,
    related: [&'static str; 4],
    keywords: &'static [&'static str],
}

const CURATED: [CuratedTopic; 4] = [
    CuratedTopic {
        key: "photosynthesis",
        objectives: [
            "Understand the process of converting light energy to chemical energy",
            "Identify the key components: chlorophyll, sunlight, water, and carbon dioxide",
            "Explain the role of photosynthesis in the carbon cycle",
            "Describe the structure and function of chloroplasts",
        ],
        difficulty: Audience::HighSchool,
        related: ["Cell Biology", "Biochemistry", "Ecology", "Plant Science"],
        keywords: &["photosynthesis", "chlorophyll", "chloroplast", "glucose", "oxygen"],
    },
    CuratedTopic {
        key: "solar_system",
        objectives: [
            "Identify the eight planets and their characteristics",
            "Understand the structure and composition of the solar system",
            "Explain planetary motion and gravitational forces",
            "Describe the role of the sun as the central star",
        ],
        difficulty: Audience::MiddleSchool,
        related: ["Astronomy", "Physics", "Space Science", "Planetary Science"],
        keywords: &["planets", "sun", "orbit", "gravity", "asteroid"],
    },
    CuratedTopic {
        key: "dna_structure",
        objectives: [
            "Understand the double helix structure of DNA",
            "Identify the four nucleotide bases and their pairing rules",
            "Explain how DNA stores genetic information",
            "Describe the role of DNA in protein synthesis",
        ],
        difficulty: Audience::HighSchool,
        related: ["Genetics", "Molecular Biology", "Biochemistry", "Evolution"],
        keywords: &["double helix", "nucleotide", "base pair", "gene", "chromosome"],
    },
    CuratedTopic {
        key: "mitochondria",
        objectives: [
            "Understand cellular respiration process",
            "Identify mitochondrial structure components",
            "Explain ATP production mechanism",
            "Describe the endosymbiotic theory of mitochondria",
        ],
        difficulty: Audience::HighSchool,
        related: ["Cell Biology", "Biochemistry", "Energy Production", "Evolution"],
        keywords: &["ATP", "cellular respiration", "cristae", "matrix", "organelle"],
    },
];

/// Learning metadata attached to a topic summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicProfile {
    pub learning_objectives: Vec<String>,
    pub difficulty: Audience,
    pub related_topics: Vec<String>,
    pub keywords: Vec<String>,
    pub curated: bool,
}

impl TopicProfile {
    /// 8 for curated topics, 6 for generic ones.
    pub fn educational_value(&self) -> u8 {
        if self.curated {
            8
        } else {
            6
        }
    }
}

/// Curated profile if the normalised topic is known, generic otherwise.
pub fn topic_profile(topic: &str) -> TopicProfile {
    let key = normalize_key(topic);
    match CURATED.iter().find(|c| c.key == key) {
        Some(c) => TopicProfile {
            learning_objectives: c.objectives.iter().map(|s| s.to_string()).collect(),
            difficulty: c.difficulty,
            related_topics: c.related.iter().map(|s| s.to_string()).collect(),
            keywords: c.keywords.iter().map(|s| s.to_string()).collect(),
            curated: true,
        },
        None => generic_profile(topic.trim()),
    }
}

fn generic_profile(topic: &str) -> TopicProfile {
    TopicProfile {
        learning_objectives: vec![
            format!("Understand the fundamental concepts of {}", topic),
            format!("Identify key components and processes in {}", topic),
            format!("Explain the importance and applications of {}", topic),
            format!(
                "Analyze the relationship between {} and related scientific principles",
                topic
            ),
        ],
        difficulty: Audience::HighSchool,
        related_topics: vec![
            format!("{} Fundamentals", topic),
            format!("Advanced {}", topic),
            format!("{} Applications", topic),
            "Scientific Methodology".to_string(),
        ],
        keywords: topic.split_whitespace().map(str::to_lowercase).collect(),
        curated: false,
    }
}

/// Description used when no article could be fetched.
pub fn generated_description(topic: &str, profile: &TopicProfile) -> String {
    match (profile.curated, profile.learning_objectives.first()) {
        (true, Some(first)) => format!("Educational content about {}. {}", topic, first),
        _ => format!(
            "Educational content about {topic}. Learn about the key concepts, processes, \
             and importance of {topic} in scientific and educational contexts."
        ),
    }
}
