use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Span};

use super::backend::ChatBackend;
use super::types::{ChatHistory, ChatMessage, ChatRequest, GenerationParams, ToolCall, ToolChoice};
use crate::skills::SkillRegistry;
use crate::{LoomError, Result};

/// Orchestrator options controlling tool exposure and round limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorOptions {
    pub tool_choice: ToolChoice,
    /// Upper bound on model round trips in one run
    pub max_rounds: usize,
    pub max_tools_exposed: usize,
    /// Sampling parameters for the conversational calls (not the skills)
    pub params: GenerationParams,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            tool_choice: ToolChoice::Auto,
            max_rounds: 8,
            max_tools_exposed: 64,
            params: GenerationParams::default(),
        }
    }
}

/// Final answer surfaced to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct FinalAnswer {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<String>,
    /// Model round trips it took, including the final one
    pub rounds: usize,
}

/// Lightweight in-orchestrator counters for observability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolOrchestratorStats {
    pub total_runs: u64,
    pub total_tool_calls: u64,
    pub total_tool_errors: u64,
    pub avg_tool_latency_ms: f64,
}

/// Lets the model pick skills from the registry until it answers in text
pub struct ToolOrchestrator {
    backend: Arc<dyn ChatBackend>,
    registry: Arc<SkillRegistry>,
    pub stats: ToolOrchestratorStats,
}

impl ToolOrchestrator {
    pub fn new(backend: Arc<dyn ChatBackend>, registry: Arc<SkillRegistry>) -> Self {
        Self {
            backend,
            registry,
            stats: ToolOrchestratorStats::default(),
        }
    }

    /// Run the conversation with skills exposed as functions.
    /// Contract:
    /// - Input: history (appended to in place) + options
    /// - Output: FinalAnswer once the model replies with text
    /// - Error: any backend or skill failure, or too many rounds; nothing is retried
    #[tracing::instrument(name = "tool_orchestrator.run", skip(self, history, options), fields(tool_choice = ?options.tool_choice, tool_count, rounds))]
    pub async fn run(
        &mut self,
        history: &mut ChatHistory,
        options: &OrchestratorOptions,
    ) -> Result<FinalAnswer> {
        self.stats.total_runs += 1;

        let tools = if options.tool_choice == ToolChoice::None {
            Vec::new()
        } else {
            let mut defs = self.registry.tool_definitions();
            defs.truncate(options.max_tools_exposed);
            defs
        };
        Span::current().record("tool_count", tools.len());
        debug!(target: "tool_orch", count = tools.len(), "Tool discovery complete");

        let mut all_calls: Vec<ToolCall> = Vec::new();
        let mut all_results: Vec<String> = Vec::new();
        let mut tool_choice = options.tool_choice;

        for round in 1..=options.max_rounds {
            let request = ChatRequest {
                messages: history.messages().to_vec(),
                params: options.params,
                tools: tools.clone(),
                tool_choice,
            };
            let started = Instant::now();
            let completion = self.backend.complete(request).await?;
            debug!(
                target: "tool_orch",
                round,
                calls = completion.tool_calls.len(),
                latency_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Model turn finished"
            );

            if completion.tool_calls.is_empty() {
                let text = completion.text().map(|s| s.to_string()).ok_or_else(|| {
                    LoomError::Orchestrator(
                        "No tool calls and no assistant text in model output".into(),
                    )
                })?;
                history.add_assistant_message(text.clone());
                Span::current().record("rounds", round);
                return Ok(FinalAnswer {
                    text,
                    tool_calls: all_calls,
                    tool_results: all_results,
                    rounds: round,
                });
            }

            // Echo the calls back with ids so tool messages can refer to them
            let calls: Vec<ToolCall> = completion
                .tool_calls
                .into_iter()
                .enumerate()
                .map(|(i, mut c)| {
                    if c.id.is_none() {
                        c.id = Some(format!("call_{}_{}", round, i));
                    }
                    c
                })
                .collect();
            history.add_message(ChatMessage::assistant_tool_calls(
                completion.content,
                calls.clone(),
            ));

            // Invoke skills sequentially, in the order the model asked for them
            for call in &calls {
                let output = self.invoke_skill(call).await?;
                history.add_message(ChatMessage::tool_result(
                    call.id.clone().unwrap_or_default(),
                    output.clone(),
                ));
                all_results.push(output);
            }
            all_calls.extend(calls);

            // Forcing a call only makes sense on the first turn
            if tool_choice == ToolChoice::Required {
                tool_choice = ToolChoice::Auto;
            }
        }

        warn!(target: "tool_orch", max_rounds = options.max_rounds, "Model kept requesting tools");
        Err(LoomError::Orchestrator(format!(
            "No final answer after {} model rounds",
            options.max_rounds
        )))
    }

    async fn invoke_skill(&mut self, call: &ToolCall) -> Result<String> {
        let started = Instant::now();
        let res = self
            .registry
            .invoke_tool_call(call, self.backend.as_ref())
            .await;
        let elapsed = started.elapsed().as_secs_f64() * 1000.0;

        self.stats.total_tool_calls += 1;
        if res.is_err() {
            self.stats.total_tool_errors += 1;
        }
        // Welford-like avg update
        let n = self.stats.total_tool_calls as f64;
        self.stats.avg_tool_latency_ms = ((self.stats.avg_tool_latency_ms * (n - 1.0)) + elapsed) / n;

        match &res {
            Ok(_) => {
                info!(target: "tool_orch", tool = %call.name, latency_ms = %elapsed, "Tool invocation finished")
            }
            Err(e) => {
                warn!(target: "tool_orch", tool = %call.name, error = %e, "Tool invocation failed")
            }
        }
        res
    }
}
