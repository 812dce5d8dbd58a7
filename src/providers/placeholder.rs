//! Local stand-ins for media no provider could produce.
//!
//! Everything here is pure and infallible: the result is an in-memory
//! [`MediaAsset`] that the pipeline writes next to real media.

use crate::types::MediaAsset;

/// `model` of shape analogies built without the image API.
pub const OFFLINE_MODEL: &str = "offline-demo-mode";
/// `model_used` of text-only animations.
pub const TEXT_ANIMATION: &str = "text_fallback";
/// `source` of topic summaries built from the local catalog.
pub const GENERATED_SOURCE: &str = "generated";
/// `image_url` stored when a topic has neither article nor illustration image.
pub const GENERATED_IMAGE: &str = "generated_placeholder.png";

fn underscored(subject: &str) -> String {
    subject.trim().replace(' ', "_")
}

/// Text file describing the image that would have been generated.
pub fn mock_image(prompt: &str, file_stem: &str) -> MediaAsset {
    let text = format!(
        "MOCK IMAGE: {prompt}\n\n\
         This would be a generated image showing:\n\
         - Geometric shapes with mathematical properties\n\
         - Educational labels and measurements\n\
         - Clean, professional mathematical illustration\n\n\
         Generated by: Shape Analogy Generator (Offline Mode)\n\
         Prompt: {prompt}\n"
    );
    MediaAsset::placeholder(format!("{}.txt", file_stem), text)
}

/// Text file describing an educational diagram for `topic`.
pub fn diagram(topic: &str) -> MediaAsset {
    let text = format!(
        "EDUCATIONAL DIAGRAM: {upper}\n\n\
         This would be a generated educational diagram showing:\n\
         - Key concepts and processes related to {topic}\n\
         - Visual representations of important structures\n\
         - Educational labels and annotations\n\
         - Professional scientific illustration style\n\n\
         Generated by: Educational Content Fetcher\n\
         Topic: {topic}\n\
         Type: Educational Diagram\n",
        upper = topic.to_uppercase(),
    );
    MediaAsset::placeholder(format!("{}_diagram.txt", underscored(topic)), text)
}

/// Text file describing the animation that would have been generated.
pub fn text_animation(concept: &str, duration_secs: u32) -> MediaAsset {
    let text = format!(
        "EDUCATIONAL ANIMATION: {upper}\n\n\
         This would be a generated educational animation showing:\n\
         - Visual representation of {concept}\n\
         - Key concepts and principles\n\
         - Interactive elements and labels\n\
         - Duration: {duration_secs} seconds\n\
         - Educational content with learning objectives\n\n\
         Generated by: Educational Animation Generator\n\
         Concept: {concept}\n\
         Type: Educational Animation\n\
         Duration: {duration_secs}s\n",
        upper = concept.to_uppercase(),
    );
    MediaAsset::placeholder(format!("{}_text_animation.txt", underscored(concept)), text)
}
