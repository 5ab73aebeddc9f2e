pub mod error;
pub mod registry;
pub mod story;
pub mod template;

// Re-export common types
pub use error::{SkillError, SkillResult};
pub use registry::{bindings_from_arguments, SkillDescriptor, SkillRegistry};
pub use story::{register_story_skills, story_skills, GENERATE_STORY, TRANSLATE_TEXT};
pub use template::{Bindings, PromptTemplate};
