//! Crew orchestration
//!
//! Runs the (agent, task) pairs sequentially, feeding each stage's output
//! into the context of the stages after it. Every LLM call goes through
//! the rate-limited invoker; a quota error is retried with backoff while
//! any other error aborts the run.

use crate::agents::Agent;
use crate::error::{Error, Result};
use crate::posting::{JobPostingRequest, TaskOutput};
use crate::tasks::Task;
use hirecrew_llm::{
    retry_with_backoff, CompletionRequest, LlmProvider, Message, RetryConfig,
};
use std::sync::Arc;
use tracing::info;

/// Result of a full crew run.
#[derive(Debug, Clone)]
pub struct CrewReport {
    /// Every stage's output, in execution order
    pub task_outputs: Vec<TaskOutput>,
    /// The final posting markdown (the review stage's output)
    pub posting: String,
}

/// The job posting crew: three agents, five tasks, sequential hand-off.
pub struct Crew {
    provider: Arc<dyn LlmProvider>,
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    retry: RetryConfig,
    temperature: f32,
    max_tokens: u32,
}

impl Crew {
    /// Create a crew over the given provider with default settings.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            agents: Agent::crew(),
            tasks: Task::pipeline(),
            retry: RetryConfig::default(),
            temperature: 0.7,
            max_tokens: 800,
        }
    }

    /// Set the retry behavior for quota-exhaustion errors.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the sampling temperature for all stages.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token budget per stage.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Names of the tasks this crew runs, in order.
    #[must_use]
    pub fn task_names(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.name.to_string()).collect()
    }

    /// Run all tasks sequentially and return the report.
    ///
    /// `web_context` is the tool-gathered research material; it is handed
    /// to the research agent's stages only.
    pub async fn kickoff(
        &self,
        request: &JobPostingRequest,
        web_context: Option<&str>,
    ) -> Result<CrewReport> {
        let mut outputs: Vec<TaskOutput> = Vec::new();

        for task in &self.tasks {
            let agent = self
                .agents
                .iter()
                .find(|a| a.id == task.agent_id)
                .ok_or_else(|| Error::UnknownAgent(task.agent_id.to_string()))?;

            let prompt = build_prompt(task, request, &outputs, web_context)?;
            let completion = CompletionRequest::new(self.provider.default_model())
                .with_message(Message::system(agent.system_prompt()))
                .with_message(Message::user(prompt))
                .with_max_tokens(self.max_tokens)
                .with_temperature(self.temperature);

            info!(task = task.name, agent = agent.role, "running task");

            let response = retry_with_backoff(
                &self.retry,
                || self.provider.complete(completion.clone()),
                hirecrew_llm::Error::backoff,
            )
            .await
            .map_err(|e| Error::Llm(e.last_error))?;

            info!(
                task = task.name,
                chars = response.content.len(),
                "task completed"
            );

            outputs.push(TaskOutput {
                task: task.name.to_string(),
                agent: agent.role.to_string(),
                content: response.content,
            });
        }

        let posting = outputs.last().map(|o| o.content.clone()).unwrap_or_default();
        Ok(CrewReport {
            task_outputs: outputs,
            posting,
        })
    }
}

/// Assemble the user prompt for one task: rendered description, expected
/// output, web research context (research agent only), and the outputs of
/// every previous stage.
fn build_prompt(
    task: &Task,
    request: &JobPostingRequest,
    previous: &[TaskOutput],
    web_context: Option<&str>,
) -> Result<String> {
    let mut prompt = task.render(request)?;

    prompt.push_str("\n\nExpected output:\n");
    prompt.push_str(task.expected_output);

    if task.agent_id == "research" {
        if let Some(context) = web_context {
            prompt.push_str("\n\nWeb research context:\n");
            prompt.push_str(context);
        }
    }

    if !previous.is_empty() {
        prompt.push_str("\n\nContext from previous tasks:\n");
        for output in previous {
            prompt.push_str(&format!("\n### {}\n{}\n", output.task, output.content));
        }
    }

    Ok(prompt)
}
