//! Single tool-round conversation orchestration.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use wcommon::RunId;
use wprovider::{
    Message, ModelProvider, ModelRequest, ModelResponse, ProviderError, ToolCall, ToolChoice,
};
use wtooling::{DefaultToolRuntime, ToolError, ToolExecutionContext, ToolRuntime};

use crate::{
    ChatError, ChatRun, ChatRunHooks, CompletionRound, Conversation, Diagnostic,
    NoopChatRunHooks, RoundState, RunOutcome,
};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// What happens when a resolved tool fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    /// Report the failure to the model as a JSON error tool result.
    #[default]
    Contain,
    /// End the run with [`RunOutcome::Failed`].
    Abort,
}

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ModelProvider>,
    tool_runtime: Arc<dyn ToolRuntime>,
    hooks: Arc<dyn ChatRunHooks>,
    model: String,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    tool_failure_policy: ToolFailurePolicy,
}

impl ChatService {
    pub fn new(provider: Arc<dyn ModelProvider>, tool_runtime: Arc<dyn ToolRuntime>) -> Self {
        Self::builder(provider).tool_runtime(tool_runtime).build()
    }

    pub fn builder(provider: Arc<dyn ModelProvider>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(provider)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tool_failure_policy(&self) -> ToolFailurePolicy {
        self.tool_failure_policy
    }

    /// Runs one conversation: a completion, at most one round of tool calls,
    /// and a second completion when tools ran.
    ///
    /// Only blank input is an `Err`; every later failure is reported through
    /// [`ChatRun::outcome`].
    pub async fn run_conversation(
        &self,
        user_text: impl Into<String>,
    ) -> Result<ChatRun, ChatError> {
        self.run_conversation_with_id(RunId::generate(), user_text)
            .await
    }

    pub async fn run_conversation_with_id(
        &self,
        run_id: RunId,
        user_text: impl Into<String>,
    ) -> Result<ChatRun, ChatError> {
        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(ChatError::invalid_request("user input must not be empty"));
        }

        let mut conversation = Conversation::new();
        if let Some(system_prompt) = &self.system_prompt {
            conversation.append(Message::system(system_prompt.clone()))?;
        }
        conversation.append(Message::user(user_text))?;

        let driver = RunDriver {
            service: self,
            run_id,
            conversation,
            diagnostics: Vec::new(),
            state: RoundState::AwaitingFirstResponse,
        };
        Ok(driver.drive().await)
    }

    fn build_request(&self, messages: &[Message]) -> Result<ModelRequest, ProviderError> {
        let tools = self.tool_runtime.definitions();
        let mut builder = ModelRequest::builder(self.model.clone())
            .messages(messages.iter().cloned());

        if !tools.is_empty() {
            builder = builder.tools(tools).tool_choice(ToolChoice::Auto);
        }

        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        builder.build()
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("provider", &self.provider.id())
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt.is_some())
            .field("tool_failure_policy", &self.tool_failure_policy)
            .finish_non_exhaustive()
    }
}

pub struct ChatServiceBuilder {
    provider: Arc<dyn ModelProvider>,
    tool_runtime: Option<Arc<dyn ToolRuntime>>,
    hooks: Arc<dyn ChatRunHooks>,
    model: String,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    tool_failure_policy: ToolFailurePolicy,
}

impl ChatServiceBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            tool_runtime: None,
            hooks: Arc::new(NoopChatRunHooks),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
            tool_failure_policy: ToolFailurePolicy::default(),
        }
    }

    pub fn tool_runtime(mut self, tool_runtime: Arc<dyn ToolRuntime>) -> Self {
        self.tool_runtime = Some(tool_runtime);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatRunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn tool_failure_policy(mut self, tool_failure_policy: ToolFailurePolicy) -> Self {
        self.tool_failure_policy = tool_failure_policy;
        self
    }

    pub fn build(self) -> ChatService {
        ChatService {
            provider: self.provider,
            tool_runtime: self
                .tool_runtime
                .unwrap_or_else(|| Arc::new(DefaultToolRuntime::default())),
            hooks: self.hooks,
            model: self.model,
            system_prompt: self.system_prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tool_failure_policy: self.tool_failure_policy,
        }
    }
}

struct RunDriver<'a> {
    service: &'a ChatService,
    run_id: RunId,
    conversation: Conversation,
    diagnostics: Vec<Diagnostic>,
    state: RoundState,
}

impl RunDriver<'_> {
    async fn drive(mut self) -> ChatRun {
        let outcome = match self.execute().await {
            Ok(outcome) => outcome,
            Err(error) => RunOutcome::Failed(error),
        };

        let run = ChatRun::new(
            self.run_id.clone(),
            self.conversation,
            outcome,
            self.diagnostics,
            self.state,
        );
        self.service.hooks.on_run_complete(&self.run_id, &run);
        run
    }

    async fn execute(&mut self) -> Result<RunOutcome, ChatError> {
        let first = match self.complete(CompletionRound::First).await {
            Ok(response) => response.into_message(),
            Err(error) => return Ok(RunOutcome::NoResponse(error)),
        };

        if !first.has_tool_calls() {
            return self.answer(first);
        }

        let tool_calls = first.tool_calls.clone();
        self.conversation.append(first)?;
        self.advance(RoundState::ExecutingTools)?;

        for tool_call in tool_calls {
            self.execute_tool(tool_call).await?;
        }

        self.advance(RoundState::AwaitingSecondResponse)?;
        let second = match self.complete(CompletionRound::Second).await {
            Ok(response) => response.into_message(),
            Err(error) => return Ok(RunOutcome::NoResponse(error)),
        };

        if second.has_tool_calls() {
            self.record(Diagnostic::IgnoredToolCalls {
                count: second.tool_calls.len(),
            });
        }

        self.answer(second)
    }

    async fn complete(&self, round: CompletionRound) -> Result<ModelResponse, ChatError> {
        let hooks = &self.service.hooks;
        hooks.on_completion_start(&self.run_id, round);
        let started_at = Instant::now();

        let result = match self.service.build_request(self.conversation.messages()) {
            Ok(request) => self
                .service
                .provider
                .complete(request)
                .await
                .map_err(ChatError::from),
            Err(error) => Err(ChatError::from(error)),
        };

        match &result {
            Ok(response) => {
                hooks.on_completion_success(&self.run_id, round, response, started_at.elapsed())
            }
            Err(error) => {
                hooks.on_completion_failure(&self.run_id, round, error, started_at.elapsed())
            }
        }

        result
    }

    async fn execute_tool(&mut self, tool_call: ToolCall) -> Result<(), ChatError> {
        let service = self.service;
        let runtime = &service.tool_runtime;

        if !runtime.resolves(&tool_call.name) {
            self.record(Diagnostic::UnknownTool {
                tool_call_id: tool_call.id,
                name: tool_call.name,
            });
            return Ok(());
        }

        if !self.conversation.awaits_tool_result(&tool_call.id) {
            self.record(Diagnostic::DuplicateToolCall {
                tool_call_id: tool_call.id,
                name: tool_call.name,
            });
            return Ok(());
        }

        let context = ToolExecutionContext::new(self.run_id.clone());
        match runtime.execute(tool_call.clone(), context).await {
            Ok(result) => self.conversation.append(result.into_message()),
            Err(error) => match service.tool_failure_policy {
                ToolFailurePolicy::Contain => {
                    self.conversation.append(Message::tool_result(
                        tool_call.id.clone(),
                        tool_call.name.clone(),
                        error_payload(&error),
                    ))?;
                    self.record(Diagnostic::ToolFailed {
                        tool_call_id: tool_call.id,
                        name: tool_call.name,
                        error,
                    });
                    Ok(())
                }
                ToolFailurePolicy::Abort => Err(ChatError::from(error)),
            },
        }
    }

    fn answer(&mut self, message: Message) -> Result<RunOutcome, ChatError> {
        self.conversation.append(message.clone())?;
        self.advance(RoundState::Done)?;
        Ok(RunOutcome::Answered(message))
    }

    fn advance(&mut self, next: RoundState) -> Result<(), ChatError> {
        self.state = self.state.transition(next)?;
        Ok(())
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        self.service.hooks.on_diagnostic(&self.run_id, &diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

fn error_payload(error: &ToolError) -> String {
    json!({ "error": error.message }).to_string()
}
