use dashmap::DashMap;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::{SkillError, SkillResult};
use super::template::{Bindings, PromptTemplate};
use crate::llm::{ChatBackend, ChatRequest, GenerationParams, ToolCall, ToolDefinition};
use crate::Result;

/// A named, templated text-generation operation
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDescriptor {
    pub name: String,
    pub description: String,
    pub template: PromptTemplate,
    pub params: GenerationParams,
}

impl SkillDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        template: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            template: PromptTemplate::new(template),
            params,
        }
    }

    /// Function declaration for the model: every placeholder is a required string
    pub fn tool_definition(&self) -> ToolDefinition {
        let placeholders = self.template.placeholders();
        let mut properties = Map::new();
        for p in &placeholders {
            properties.insert(p.to_string(), json!({ "type": "string" }));
        }
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": properties,
                "required": placeholders,
                "additionalProperties": false,
            }),
        }
    }
}

/// A registry for the skills the model may invoke
#[derive(Clone, Default)]
pub struct SkillRegistry {
    skills: Arc<DashMap<String, Arc<SkillDescriptor>>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill; an existing skill with the same name is replaced and returned
    pub fn register(&self, skill: SkillDescriptor) -> Option<Arc<SkillDescriptor>> {
        info!(target: "skill_registry", skill = %skill.name, "Registering skill");
        let replaced = self.skills.insert(skill.name.clone(), Arc::new(skill));
        if let Some(old) = &replaced {
            debug!(target: "skill_registry", skill = %old.name, "Replaced previous registration");
        }
        replaced
    }

    /// Get a skill by name
    pub fn get(&self, name: &str) -> Option<Arc<SkillDescriptor>> {
        self.skills.get(name).map(|s| s.clone())
    }

    /// All skills, sorted by name
    pub fn list(&self) -> Vec<Arc<SkillDescriptor>> {
        let mut all: Vec<_> = self.skills.iter().map(|s| s.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Function declarations for every registered skill, sorted by name
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.list().iter().map(|s| s.tool_definition()).collect()
    }

    /// Fill the skill's template and send it to the backend.
    ///
    /// Lookup and rendering happen before any network call, so unknown skills
    /// and unbound placeholders never reach the backend.
    #[tracing::instrument(skip(self, bindings, backend), fields(skill.name = %name))]
    pub async fn invoke(
        &self,
        name: &str,
        bindings: &Bindings,
        backend: &dyn ChatBackend,
    ) -> Result<String> {
        let skill = self
            .get(name)
            .ok_or_else(|| SkillError::UnknownSkill(name.to_string()))?;

        let prompt = skill
            .template
            .render(bindings)
            .map_err(|placeholder| SkillError::MissingBinding {
                skill: name.to_string(),
                placeholder,
            })?;

        debug!(target: "skill_registry", skill = %name, prompt_chars = prompt.len(), "Invoking skill");

        let request = ChatRequest::from_prompt(prompt, skill.params);
        let completion = match backend.complete(request).await {
            Ok(c) => c,
            Err(e) => {
                warn!(target: "skill_registry", skill = %name, error = %e, "Skill invocation failed");
                return Err(e);
            }
        };

        completion
            .content
            .ok_or_else(|| SkillError::EmptyOutput(name.to_string()).into())
    }

    /// Invoke the skill a model-issued tool call names
    pub async fn invoke_tool_call(&self, call: &ToolCall, backend: &dyn ChatBackend) -> Result<String> {
        let bindings = bindings_from_arguments(&call.arguments)?;
        self.invoke(&call.name, &bindings, backend).await
    }
}

/// Convert JSON tool-call arguments into template bindings.
///
/// Strings are taken verbatim, other values by their JSON text; nulls are skipped.
pub fn bindings_from_arguments(arguments: &Value) -> SkillResult<Bindings> {
    let obj = match arguments {
        Value::Object(obj) => obj,
        Value::Null => return Ok(Bindings::new()),
        other => {
            return Err(SkillError::InvalidArguments(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };
    let mut bindings = Bindings::new();
    for (k, v) in obj {
        match v {
            Value::Null => {}
            Value::String(s) => {
                bindings.insert(k.clone(), s.clone());
            }
            other => {
                bindings.insert(k.clone(), other.to_string());
            }
        }
    }
    Ok(bindings)
}
