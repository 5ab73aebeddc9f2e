use super::registry::{SkillDescriptor, SkillRegistry};
use crate::llm::GenerationParams;

pub const GENERATE_STORY: &str = "generate_story";
pub const TRANSLATE_TEXT: &str = "translate_text";

const STORY_TEMPLATE: &str = "Write a short story (100-150 words) based on the following prompt: {{ $prompt }}.\n\
The story should have a clear beginning, middle, and end.";

const TRANSLATION_TEMPLATE: &str = "Translate the following text into {{ $target_language }}: {{ $text }}";

/// The built-in story skills: generation and translation
pub fn story_skills() -> Vec<SkillDescriptor> {
    vec![
        SkillDescriptor::new(
            GENERATE_STORY,
            "Generates a short story based on a prompt",
            STORY_TEMPLATE,
            GenerationParams::new(300, 0.7),
        ),
        SkillDescriptor::new(
            TRANSLATE_TEXT,
            "Translates text into a specified language",
            TRANSLATION_TEMPLATE,
            GenerationParams::new(500, 0.3),
        ),
    ]
}

pub fn register_story_skills(registry: &SkillRegistry) {
    for skill in story_skills() {
        registry.register(skill);
    }
}
