// Loom Skills Library
// Prompt-templated LLM skills driven by model-side function calling

pub mod context;
pub mod llm;
pub mod skills;
pub mod workflow;

// Export core types
pub use context::SkillContext;
pub use llm::{
    ChatBackend, ChatCompletion, ChatHistory, ChatMessage, ChatRequest, ChatRole,
    GenerationParams, LlmClient, LlmClientConfig, OrchestratorOptions, ToolCall, ToolChoice,
    ToolDefinition, ToolOrchestrator,
};
pub use skills::{Bindings, PromptTemplate, SkillDescriptor, SkillError, SkillRegistry};
pub use workflow::{build_instruction, run_story_workflow, WorkflowOutcome};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Skill error: {0}")]
    Skill(#[from] SkillError),

    #[error("Orchestrator error: {0}")]
    Orchestrator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, LoomError>;
