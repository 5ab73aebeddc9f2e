use std::sync::Arc;

use crate::llm::{ChatBackend, OrchestratorOptions};
use crate::skills::{register_story_skills, SkillRegistry};

/// Everything one run needs: the skill table, the model handle, and options.
///
/// Built once at startup and only read afterwards.
#[derive(Clone)]
pub struct SkillContext {
    pub registry: Arc<SkillRegistry>,
    pub backend: Arc<dyn ChatBackend>,
    pub options: OrchestratorOptions,
}

impl SkillContext {
    pub fn new(
        registry: Arc<SkillRegistry>,
        backend: Arc<dyn ChatBackend>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            registry,
            backend,
            options,
        }
    }

    /// Context with `generate_story` and `translate_text` registered
    pub fn with_story_skills(backend: Arc<dyn ChatBackend>, options: OrchestratorOptions) -> Self {
        let registry = SkillRegistry::new();
        register_story_skills(&registry);
        Self::new(Arc::new(registry), backend, options)
    }
}
