use std::sync::{Arc, Mutex};
use std::time::Duration;

use wchat::{
    ChatError, ChatRun, ChatRunHooks, ChatService, CompletionRound, Diagnostic, RunId,
};
use wprovider::{
    Message, ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderFuture,
    ProviderId, StopReason, TokenUsage, ToolCall,
};
use wtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

use crate::{
    CombinedHooks, MetricsObservabilityHooks, SafeChatHooks, SafeToolHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall {
        id: "call-1".to_string(),
        name: "get_current_weather".to_string(),
        arguments: r#"{"location":"Paris"}"#.to_string(),
    }
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new("run-1")
}

fn sample_tool_result() -> ToolExecutionResult {
    ToolExecutionResult::from_call(&sample_tool_call(), r#"{"location":"Paris"}"#)
}

fn sample_response() -> ModelResponse {
    ModelResponse {
        provider: ProviderId::OpenAi,
        model: "gpt-4o-mini".to_string(),
        message: Message::assistant("Mild in Paris."),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

struct UnavailableProvider;

impl ModelProvider for UnavailableProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn complete<'a>(
        &'a self,
        _request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async { Err(ProviderError::unavailable("service down")) })
    }
}

async fn failed_run() -> ChatRun {
    ChatService::builder(Arc::new(UnavailableProvider))
        .build()
        .run_conversation_with_id(RunId::new("run-1"), "Weather in Paris?")
        .await
        .expect("run should start")
}

fn exercise_chat_hooks(hooks: &dyn ChatRunHooks, run: &ChatRun) {
    let run_id = RunId::new("run-1");
    let error = ChatError::from(ProviderError::timeout("provider timeout"));
    let diagnostic = Diagnostic::UnknownTool {
        tool_call_id: "call-9".to_string(),
        name: "get_forecast".to_string(),
    };

    hooks.on_completion_start(&run_id, CompletionRound::First);
    hooks.on_completion_success(
        &run_id,
        CompletionRound::First,
        &sample_response(),
        Duration::from_millis(15),
    );
    hooks.on_completion_failure(
        &run_id,
        CompletionRound::Second,
        &error,
        Duration::from_millis(15),
    );
    hooks.on_diagnostic(&run_id, &diagnostic);
    hooks.on_run_complete(&run_id, run);
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks) {
    let tool_error = ToolError::execution("tool failed");

    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &sample_tool_result(),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &tool_error,
        Duration::from_millis(20),
    );
}

#[tokio::test]
async fn tracing_hooks_smoke_test_all_callbacks() {
    let run = failed_run().await;
    let hooks = TracingObservabilityHooks;

    exercise_chat_hooks(&hooks, &run);
    exercise_tool_hooks(&hooks);
}

#[tokio::test]
async fn metrics_hooks_smoke_test_all_callbacks() {
    let run = failed_run().await;
    let hooks = MetricsObservabilityHooks;

    exercise_chat_hooks(&hooks, &run);
    exercise_tool_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingChatHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ChatRunHooks for RecordingChatHooks {
    fn on_completion_start(&self, _run_id: &RunId, _round: CompletionRound) {
        self.events.lock().expect("events lock").push("start");
    }

    fn on_completion_success(
        &self,
        _run_id: &RunId,
        _round: CompletionRound,
        _response: &ModelResponse,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("success");
    }

    fn on_completion_failure(
        &self,
        _run_id: &RunId,
        _round: CompletionRound,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("failure");
    }

    fn on_diagnostic(&self, _run_id: &RunId, _diagnostic: &Diagnostic) {
        self.events.lock().expect("events lock").push("diagnostic");
    }

    fn on_run_complete(&self, _run_id: &RunId, _run: &ChatRun) {
        self.events.lock().expect("events lock").push("complete");
    }
}

#[derive(Default, Clone)]
struct RecordingToolHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ToolRuntimeHooks for RecordingToolHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        self.events.lock().expect("events lock").push("start");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("success");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("failure");
    }
}

struct PanicChatHooks;

impl ChatRunHooks for PanicChatHooks {
    fn on_completion_start(&self, _run_id: &RunId, _round: CompletionRound) {
        panic!("start panic");
    }

    fn on_completion_success(
        &self,
        _run_id: &RunId,
        _round: CompletionRound,
        _response: &ModelResponse,
        _elapsed: Duration,
    ) {
        panic!("success panic");
    }

    fn on_completion_failure(
        &self,
        _run_id: &RunId,
        _round: CompletionRound,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }

    fn on_diagnostic(&self, _run_id: &RunId, _diagnostic: &Diagnostic) {
        panic!("diagnostic panic");
    }

    fn on_run_complete(&self, _run_id: &RunId, _run: &ChatRun) {
        panic!("complete panic");
    }
}

struct PanicToolHooks;

impl ToolRuntimeHooks for PanicToolHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("start panic");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        panic!("success panic");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

#[tokio::test]
async fn safe_chat_hooks_delegate_when_inner_succeeds() {
    let run = failed_run().await;
    let inner = RecordingChatHooks::default();
    let events = Arc::clone(&inner.events);
    let hooks = SafeChatHooks::new(inner);

    exercise_chat_hooks(&hooks, &run);

    assert_eq!(
        *events.lock().expect("events lock"),
        vec!["start", "success", "failure", "diagnostic", "complete"]
    );
}

#[test]
fn safe_tool_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingToolHooks::default();
    let events = Arc::clone(&inner.events);
    let hooks = SafeToolHooks::new(inner);

    exercise_tool_hooks(&hooks);

    assert_eq!(events.lock().expect("events lock").len(), 3);
}

#[tokio::test]
async fn safe_chat_hooks_swallow_panics() {
    let run = failed_run().await;
    let hooks = SafeChatHooks::new(PanicChatHooks);

    exercise_chat_hooks(&hooks, &run);
}

#[test]
fn safe_tool_hooks_swallow_panics() {
    let hooks = SafeToolHooks::new(PanicToolHooks);

    exercise_tool_hooks(&hooks);
}

#[tokio::test]
async fn panicking_hooks_do_not_abort_a_run() {
    let run = ChatService::builder(Arc::new(UnavailableProvider))
        .hooks(Arc::new(SafeChatHooks::new(PanicChatHooks)))
        .build()
        .run_conversation("Weather in Tokyo?")
        .await
        .expect("run should start");

    assert_eq!(run.outcome().as_str(), "no_response");
    assert_eq!(run.conversation().len(), 1);
}

#[test]
fn combined_hooks_fan_out_in_order() {
    let first = RecordingToolHooks::default();
    let second = RecordingToolHooks::default();
    let first_events = Arc::clone(&first.events);
    let second_events = Arc::clone(&second.events);
    let hooks = CombinedHooks::new(first, second);

    exercise_tool_hooks(&hooks);

    let expected = vec!["start", "success", "failure"];
    assert_eq!(*first_events.lock().expect("events lock"), expected);
    assert_eq!(*second_events.lock().expect("events lock"), expected);
}
