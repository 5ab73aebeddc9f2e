mod common;

use common::{FnBackend, ScriptedBackend};
use loom_skills::llm::{ChatCompletion, GenerationParams, ToolCall};
use loom_skills::skills::{register_story_skills, GENERATE_STORY, TRANSLATE_TEXT};
use loom_skills::{Bindings, LoomError, SkillDescriptor, SkillError, SkillRegistry};
use serde_json::json;

fn bindings(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn generate_story_substitutes_prompt() -> loom_skills::Result<()> {
    let registry = SkillRegistry::new();
    register_story_skills(&registry);
    let backend = FnBackend::fixed("a story");

    let text = registry
        .invoke(GENERATE_STORY, &bindings(&[("prompt", "X")]), &backend)
        .await?;
    assert_eq!(text, "a story");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].messages[0].content,
        "Write a short story (100-150 words) based on the following prompt: X.\n\
         The story should have a clear beginning, middle, and end."
    );
    assert_eq!(requests[0].params, GenerationParams::new(300, 0.7));
    Ok(())
}

#[tokio::test]
async fn generate_story_without_prompt_is_missing_binding() {
    let registry = SkillRegistry::new();
    register_story_skills(&registry);
    let backend = FnBackend::fixed("unused");

    let err = registry
        .invoke(GENERATE_STORY, &Bindings::new(), &backend)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoomError::Skill(SkillError::MissingBinding { ref placeholder, .. }) if placeholder == "prompt"
    ));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn unknown_skill_does_not_contact_backend() {
    let registry = SkillRegistry::new();
    register_story_skills(&registry);
    let backend = ScriptedBackend::new(vec![]);

    let err = registry
        .invoke("nonexistent_skill", &Bindings::new(), &backend)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Skill error: Skill not found: nonexistent_skill");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn last_registration_wins() -> loom_skills::Result<()> {
    let registry = SkillRegistry::new();
    register_story_skills(&registry);

    let replaced = registry.register(SkillDescriptor::new(
        GENERATE_STORY,
        "Writes a haiku",
        "Haiku about {{ $prompt }}",
        GenerationParams::new(60, 1.0),
    ));
    assert_eq!(
        replaced.map(|d| d.description.clone()).as_deref(),
        Some("Generates a short story based on a prompt")
    );
    assert_eq!(registry.len(), 2);

    let backend = ScriptedBackend::new(vec![Ok(ChatCompletion::from_text("leaves fall"))]);
    registry
        .invoke(GENERATE_STORY, &bindings(&[("prompt", "autumn")]), &backend)
        .await?;
    let requests = backend.requests();
    assert_eq!(requests[0].messages[0].content, "Haiku about autumn");
    assert_eq!(requests[0].params, GenerationParams::new(60, 1.0));
    Ok(())
}

#[tokio::test]
async fn translate_requires_both_arguments() {
    let registry = SkillRegistry::new();
    register_story_skills(&registry);
    let backend = FnBackend::fixed("unused");

    let err = registry
        .invoke(TRANSLATE_TEXT, &bindings(&[("text", "hello")]), &backend)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoomError::Skill(SkillError::MissingBinding { ref placeholder, .. }) if placeholder == "target_language"
    ));
}

#[tokio::test]
async fn tool_call_arguments_become_bindings() -> loom_skills::Result<()> {
    let registry = SkillRegistry::new();
    register_story_skills(&registry);
    let backend = FnBackend::fixed("Hola");

    let call = ToolCall {
        id: Some("call_1".into()),
        name: TRANSLATE_TEXT.into(),
        arguments: json!({"text": "Hello", "target_language": "Spanish"}),
    };
    assert_eq!(registry.invoke_tool_call(&call, &backend).await?, "Hola");
    assert_eq!(
        backend.requests()[0].messages[0].content,
        "Translate the following text into Spanish: Hello"
    );

    let bad = ToolCall {
        id: None,
        name: TRANSLATE_TEXT.into(),
        arguments: json!("Hello"),
    };
    let err = registry.invoke_tool_call(&bad, &backend).await.unwrap_err();
    assert!(matches!(err, LoomError::Skill(SkillError::InvalidArguments(_))));
    Ok(())
}

#[test]
fn list_and_definitions_are_sorted_by_name() {
    let registry = SkillRegistry::new();
    assert!(registry.is_empty());
    register_story_skills(&registry);

    let names: Vec<_> = registry.list().iter().map(|s| s.name.clone()).collect();
    assert_eq!(names, vec![GENERATE_STORY, TRANSLATE_TEXT]);

    let defs = registry.tool_definitions();
    assert_eq!(defs[0].parameters["required"], json!(["prompt"]));
    assert_eq!(defs[1].description, "Translates text into a specified language");
}
