use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkillError {
    #[error("Skill not found: {0}")]
    UnknownSkill(String),

    #[error("Missing binding for '{placeholder}' in skill '{skill}'")]
    MissingBinding { skill: String, placeholder: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Skill '{0}' produced no output")]
    EmptyOutput(String),
}

pub type SkillResult<T> = Result<T, SkillError>;
