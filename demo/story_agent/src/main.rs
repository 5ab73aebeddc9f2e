mod config;
use config::StoryAgentConfig;
use loom_skills::{run_story_workflow, LlmClient, SkillContext};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up OPENAI_API_KEY and friends from ./.env when present
    let _ = dotenvy::dotenv();

    // Logging / tracing (stderr, so stdout only carries the result)
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "warn,loom_skills=info,story_agent=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Configuration errors are fatal and happen before any prompt
    let cfg = StoryAgentConfig::load()?;
    info!(
        target: "story_agent",
        model = %cfg.llm.model,
        base_url = %cfg.llm.base_url,
        "Starting Story Agent: prompt → generate_story → translate_text"
    );

    let client = LlmClient::new(cfg.llm.clone())?;
    let ctx = SkillContext::with_story_skills(Arc::new(client), cfg.orchestrator.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let prompt = ask(&mut lines, "Enter the story prompt (e.g., 'a hidden cave'): ").await?;
    let target_language =
        ask(&mut lines, "Enter the target language (e.g., 'Spanish'): ").await?;

    // Failures inside the run are printed by the workflow; the exit code stays 0
    let mut stdout = std::io::stdout();
    run_story_workflow(&ctx, &prompt, &target_language, &mut stdout).await;
    Ok(())
}

async fn ask(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> std::io::Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}
