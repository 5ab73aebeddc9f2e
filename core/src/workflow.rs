//! The single-run story workflow: one instruction in, one printed answer out.

use std::io::Write;

use tracing::{error, info};

use crate::context::SkillContext;
use crate::llm::{ChatHistory, ToolOrchestrator};

/// Label printed before a caught failure
pub const ERROR_PREFIX: &str = "Error during execution: ";

/// What happened in a run. The history stays in memory only.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Completed { text: String, history: ChatHistory },
    Failed { message: String },
}

impl WorkflowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed { .. })
    }
}

pub fn build_instruction(prompt: &str, target_language: &str) -> String {
    format!("Generate a short story about '{prompt}' and translate it into {target_language}.")
}

/// Ask the model to write and translate a story, printing the result to `out`.
///
/// Every remote or skill failure is caught here and printed; nothing propagates.
/// Write errors on `out` are ignored.
pub async fn run_story_workflow<W: Write>(
    ctx: &SkillContext,
    prompt: &str,
    target_language: &str,
    out: &mut W,
) -> WorkflowOutcome {
    let instruction = build_instruction(prompt, target_language);
    info!(target: "workflow", %instruction, "Starting story workflow");

    let mut history = ChatHistory::new();
    history.add_user_message(instruction);

    let mut orchestrator = ToolOrchestrator::new(ctx.backend.clone(), ctx.registry.clone());
    match orchestrator.run(&mut history, &ctx.options).await {
        Ok(answer) => {
            info!(
                target: "workflow",
                rounds = answer.rounds,
                tool_calls = answer.tool_calls.len(),
                "Story workflow finished"
            );
            let _ = write!(out, "\nFinal Result:\n{}\n", answer.text);
            let _ = out.flush();
            WorkflowOutcome::Completed {
                text: answer.text,
                history,
            }
        }
        Err(e) => {
            error!(target: "workflow", error = %e, "Story workflow failed");
            let message = format!("{ERROR_PREFIX}{e}");
            let _ = writeln!(out, "{message}");
            let _ = out.flush();
            WorkflowOutcome::Failed { message }
        }
    }
}
