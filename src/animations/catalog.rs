//! Curated teaching material for animated concepts.

use std::ops::RangeInclusive;

use crate::catalog::normalize_key;
use crate::types::Audience;

struct CuratedConcept {
    key: &'static str,
    learning_goals: [&'static str; 4],
    key_learning_points: [&'static str; 4],
    tricky_questions: [&'static str; 4],
    animation_prompt: &'static str,
    difficulty: Audience,
    durations: (u32, u32),
}

const CURATED: [CuratedConcept; 7] = [
    CuratedConcept {
        key: "wave_propagation",
        learning_goals: [
            "Understand wave properties: amplitude, frequency, wavelength",
            "Visualize wave motion and energy transfer",
            "Explain wave interference and superposition",
            "Apply wave concepts to real-world phenomena",
        ],
        key_learning_points: [
            "Waves transfer energy without transferring matter",
            "Wave speed depends on medium properties",
            "Interference creates constructive and destructive patterns",
            "Frequency determines pitch in sound waves",
        ],
        tricky_questions: [
            "How does wave frequency affect energy transfer?",
            "What happens when waves of different frequencies interfere?",
            "Why do waves bend when changing medium?",
            "How do standing waves form and what are their properties?",
        ],
        animation_prompt: "Educational animation showing wave propagation with amplitude, frequency, and wavelength clearly labeled",
        difficulty: Audience::HighSchool,
        durations: (8, 12),
    },
    CuratedConcept {
        key: "pendulum_motion",
        learning_goals: [
            "Understand simple harmonic motion principles",
            "Visualize the relationship between displacement and restoring force",
            "Explain how pendulum length affects period",
            "Apply energy conservation in oscillatory motion",
        ],
        key_learning_points: [
            "Period depends only on length and gravity, not mass",
            "Energy oscillates between kinetic and potential",
            "Amplitude affects maximum speed but not period",
            "Small angle approximation simplifies calculations",
        ],
        tricky_questions: [
            "Why doesn't pendulum period depend on mass?",
            "How does air resistance affect pendulum motion?",
            "What happens when pendulum amplitude increases?",
            "How do you calculate pendulum energy at different positions?",
        ],
        animation_prompt: "Educational animation showing pendulum motion with energy graphs and period calculations",
        difficulty: Audience::HighSchool,
        durations: (6, 10),
    },
    CuratedConcept {
        key: "chemical_reactions",
        learning_goals: [
            "Understand molecular bonding and breaking",
            "Visualize energy changes during reactions",
            "Explain activation energy and catalysts",
            "Apply conservation of mass and energy",
        ],
        key_learning_points: [
            "Bonds break and form during chemical reactions",
            "Activation energy is required to start reactions",
            "Catalysts lower activation energy",
            "Mass and energy are conserved in reactions",
        ],
        tricky_questions: [
            "How do catalysts speed up reactions?",
            "Why do some reactions require heat to start?",
            "What determines reaction rate?",
            "How do you balance chemical equations?",
        ],
        animation_prompt: "Educational animation showing molecular bonding, bond breaking, and energy changes in chemical reactions",
        difficulty: Audience::HighSchool,
        durations: (10, 15),
    },
    CuratedConcept {
        key: "sine_wave",
        learning_goals: [
            "Understand sine wave mathematical properties",
            "Visualize amplitude, frequency, and phase relationships",
            "Explain sine wave applications in physics and engineering",
            "Apply trigonometric functions to wave analysis",
        ],
        key_learning_points: [
            "Sine waves are fundamental to wave analysis",
            "Amplitude determines wave strength",
            "Frequency determines wave speed",
            "Phase shift affects wave timing",
        ],
        tricky_questions: [
            "How do you calculate sine wave frequency?",
            "What causes phase shifts in waves?",
            "How do you add two sine waves together?",
            "What are the applications of sine waves in technology?",
        ],
        animation_prompt: "Educational animation showing sine wave generation with mathematical equations and real-world applications",
        difficulty: Audience::HighSchool,
        durations: (8, 12),
    },
    CuratedConcept {
        key: "planetary_orbits",
        learning_goals: [
            "Understand gravitational forces and orbital mechanics",
            "Visualize elliptical orbits and Kepler's laws",
            "Explain how orbital velocity changes with distance",
            "Apply conservation of angular momentum",
        ],
        key_learning_points: [
            "Planets follow elliptical orbits around the sun",
            "Orbital velocity decreases with distance",
            "Angular momentum is conserved in orbits",
            "Gravitational force provides centripetal acceleration",
        ],
        tricky_questions: [
            "Why are planetary orbits elliptical, not circular?",
            "How does orbital velocity change throughout the year?",
            "What causes orbital precession?",
            "How do you calculate orbital period?",
        ],
        animation_prompt: "Educational animation showing planetary orbital mechanics with gravitational forces and Kepler's laws",
        difficulty: Audience::HighSchool,
        durations: (10, 15),
    },
    CuratedConcept {
        key: "molecular_bonding",
        learning_goals: [
            "Understand different types of chemical bonds",
            "Visualize electron sharing and transfer",
            "Explain bond strength and stability",
            "Apply molecular geometry principles",
        ],
        key_learning_points: [
            "Covalent bonds involve electron sharing",
            "Ionic bonds involve electron transfer",
            "Bond strength depends on electronegativity",
            "Molecular geometry affects properties",
        ],
        tricky_questions: [
            "What determines bond type between atoms?",
            "How do you predict molecular geometry?",
            "Why are some bonds stronger than others?",
            "How do intermolecular forces affect properties?",
        ],
        animation_prompt: "Educational animation showing molecular bonding with electron movement and bond formation",
        difficulty: Audience::HighSchool,
        durations: (8, 12),
    },
    CuratedConcept {
        key: "geometric_transformations",
        learning_goals: [
            "Understand translation, rotation, and scaling",
            "Visualize transformation matrices",
            "Explain coordinate system changes",
            "Apply transformations to solve problems",
        ],
        key_learning_points: [
            "Transformations preserve shape properties",
            "Matrices represent transformations efficiently",
            "Combining transformations creates complex motions",
            "Transformations are used in computer graphics",
        ],
        tricky_questions: [
            "How do you combine multiple transformations?",
            "What's the difference between rotation and reflection?",
            "How do transformations affect area and volume?",
            "What are the applications in computer graphics?",
        ],
        animation_prompt: "Educational animation showing geometric transformations with mathematical matrices and visual examples",
        difficulty: Audience::HighSchool,
        durations: (6, 10),
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct ConceptProfile {
    pub learning_goals: Vec<String>,
    pub key_learning_points: Vec<String>,
    pub tricky_questions: Vec<String>,
    pub animation_prompt: String,
    pub difficulty: Audience,
    /// Durations the concept is best shown at; informational only.
    pub suggested_durations: RangeInclusive<u32>,
    pub curated: bool,
}

impl ConceptProfile {
    pub fn educational_value(&self) -> u8 {
        if self.curated {
            8
        } else {
            6
        }
    }
}

fn owned<const N: usize>(items: &[&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Curated profile if the normalised concept is known, generic otherwise.
pub fn concept_profile(concept: &str) -> ConceptProfile {
    let key = normalize_key(concept);
    match CURATED.iter().find(|c| c.key == key) {
        Some(c) => ConceptProfile {
            learning_goals: owned(&c.learning_goals),
            key_learning_points: owned(&c.key_learning_points),
            tricky_questions: owned(&c.tricky_questions),
            animation_prompt: c.animation_prompt.to_string(),
            difficulty: c.difficulty,
            suggested_durations: c.durations.0..=c.durations.1,
            curated: true,
        },
        None => generic_profile(concept.trim()),
    }
}

fn generic_profile(concept: &str) -> ConceptProfile {
    ConceptProfile {
        learning_goals: vec![
            format!("Understand the basics of {}", concept),
            format!("Visualize {} dynamically", concept),
            format!("Apply {} to practical examples", concept),
        ],
        key_learning_points: vec![
            format!("{} illustrated in motion", concept),
            "Highlights cause-effect relationships".to_string(),
            "Links visual understanding with theory".to_string(),
        ],
        tricky_questions: vec![
            format!("Explain the physics behind {}", concept),
            format!("How does {} change if parameters vary?", concept),
            format!("Where is {} applied in real-world systems?", concept),
        ],
        animation_prompt: format!("Educational animation of {}", concept),
        difficulty: Audience::HighSchool,
        suggested_durations: 5..=15,
        curated: false,
    }
}
