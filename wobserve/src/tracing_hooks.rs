//! Tracing-based observability hooks for completion rounds and tool execution.
//!
//! ```rust
//! use wchat::ChatRunHooks;
//! use wobserve::TracingObservabilityHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatRunHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use wchat::{ChatError, ChatRun, ChatRunHooks, CompletionRound, Diagnostic, RunOutcome};
use wcommon::RunId;
use wprovider::{ModelResponse, ToolCall};
use wtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ChatRunHooks for TracingObservabilityHooks {
    fn on_completion_start(&self, run_id: &RunId, round: CompletionRound) {
        tracing::info!(
            phase = "completion",
            event = "start",
            run_id = %run_id,
            round = round.as_str()
        );
    }

    fn on_completion_success(
        &self,
        run_id: &RunId,
        round: CompletionRound,
        response: &ModelResponse,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "completion",
            event = "success",
            run_id = %run_id,
            round = round.as_str(),
            provider = %response.provider,
            model = response.model,
            stop_reason = ?response.stop_reason,
            tool_calls = response.tool_calls().len(),
            total_tokens = response.usage.total_tokens,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_completion_failure(
        &self,
        run_id: &RunId,
        round: CompletionRound,
        error: &ChatError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "completion",
            event = "failure",
            run_id = %run_id,
            round = round.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            provider_error_kind = ?error.provider_kind(),
            error = %error
        );
    }

    fn on_diagnostic(&self, run_id: &RunId, diagnostic: &Diagnostic) {
        tracing::warn!(
            phase = "run",
            event = "diagnostic",
            run_id = %run_id,
            code = diagnostic.code(),
            tool_name = diagnostic.tool_name(),
            detail = %diagnostic
        );
    }

    fn on_run_complete(&self, run_id: &RunId, run: &ChatRun) {
        match run.outcome() {
            RunOutcome::Answered(_) => tracing::info!(
                phase = "run",
                event = "complete",
                run_id = %run_id,
                outcome = run.outcome().as_str(),
                state = run.state().as_str(),
                messages = run.conversation().len(),
                diagnostics = run.diagnostics().len()
            ),
            RunOutcome::NoResponse(error) | RunOutcome::Failed(error) => tracing::error!(
                phase = "run",
                event = "complete",
                run_id = %run_id,
                outcome = run.outcome().as_str(),
                state = run.state().as_str(),
                messages = run.conversation().len(),
                diagnostics = run.diagnostics().len(),
                error_kind = ?error.kind,
                error = %error
            ),
        }
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            run_id = %context.run_id
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            run_id = %context.run_id,
            output_bytes = result.output.len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            run_id = %context.run_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            user_error = error.is_user_error(),
            error = %error
        );
    }
}
