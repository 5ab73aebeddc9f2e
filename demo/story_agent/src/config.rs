use std::fs;
use std::path::Path;

use loom_skills::llm::{LlmClientConfig, OrchestratorOptions, ToolChoice};
use loom_skills::Result;

/// High-level configuration for the Story Agent demo
#[derive(Clone, Debug)]
pub struct StoryAgentConfig {
    pub llm: LlmClientConfig,
    pub orchestrator: OrchestratorOptions,
}

impl StoryAgentConfig {
    /// Env-driven defaults. Fails when `OPENAI_API_KEY` is missing.
    pub fn from_env() -> Result<Self> {
        let mut orchestrator = OrchestratorOptions::default();
        if let Some(v) = std::env::var("STORY_MAX_ROUNDS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            orchestrator.max_rounds = v.max(1);
        }
        Ok(Self {
            llm: LlmClientConfig::from_env()?,
            orchestrator,
        })
    }

    /// Load configuration from a TOML file (path via STORY_AGENT_CONFIG or ./story_agent.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Result<Self> {
        let default = Self::from_env()?;
        let path =
            std::env::var("STORY_AGENT_CONFIG").unwrap_or_else(|_| "story_agent.toml".into());
        Ok(default.overlay_file(Path::new(&path)))
    }

    fn overlay_file(self, p: &Path) -> Self {
        if !p.exists() {
            tracing::info!(target: "story_agent", path = %p.display(), "No TOML config found; using defaults/env");
            return self;
        }
        match fs::read_to_string(p) {
            Ok(s) => self.overlay_str(&s),
            Err(e) => {
                tracing::warn!(target: "story_agent", error = %e, "Failed to read TOML; using defaults");
                self
            }
        }
    }

    fn overlay_str(self, s: &str) -> Self {
        match toml::from_str::<StoryAgentToml>(s) {
            Ok(t) => t.overlay(self),
            Err(e) => {
                tracing::warn!(target: "story_agent", error = %e, "Failed to parse TOML; using defaults");
                self
            }
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct StoryAgentToml {
    pub llm: Option<LlmToml>,
    pub orchestrator: Option<OrchestratorToml>,
}

impl StoryAgentToml {
    fn overlay(self, mut base: StoryAgentConfig) -> StoryAgentConfig {
        if let Some(l) = self.llm {
            l.apply(&mut base.llm);
        }
        if let Some(o) = self.orchestrator {
            o.apply(&mut base.orchestrator);
        }
        base
    }
}

// No api_key: the key only comes from the environment
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct LlmToml {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub temperature: Option<f32>,
}
impl LlmToml {
    fn apply(self, l: &mut LlmClientConfig) {
        if let Some(x) = self.base_url {
            l.base_url = x;
        }
        if let Some(x) = self.model {
            l.model = x;
        }
        if let Some(x) = self.request_timeout_ms {
            l.request_timeout_ms = x;
        }
        if let Some(x) = self.temperature {
            l.temperature = Some(x);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct OrchestratorToml {
    pub tool_choice: Option<ToolChoice>,
    pub max_rounds: Option<usize>,
    pub max_tools_exposed: Option<usize>,
}
impl OrchestratorToml {
    fn apply(self, o: &mut OrchestratorOptions) {
        if let Some(x) = self.tool_choice {
            o.tool_choice = x;
        }
        if let Some(x) = self.max_rounds {
            o.max_rounds = x.max(1);
        }
        if let Some(x) = self.max_tools_exposed {
            o.max_tools_exposed = x;
        }
    }
}
