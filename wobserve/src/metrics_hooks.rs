//! Metrics-based observability hooks for completion rounds and tool execution.
//!
//! ```rust
//! use wobserve::MetricsObservabilityHooks;
//! use wtooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use wchat::{ChatError, ChatRun, ChatRunHooks, CompletionRound, Diagnostic};
use wcommon::RunId;
use wprovider::{ModelResponse, ToolCall};
use wtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ChatRunHooks for MetricsObservabilityHooks {
    fn on_completion_start(&self, _run_id: &RunId, round: CompletionRound) {
        metrics::counter!(
            "weatherwise_completion_start_total",
            "round" => round.as_str()
        )
        .increment(1);
    }

    fn on_completion_success(
        &self,
        _run_id: &RunId,
        round: CompletionRound,
        response: &ModelResponse,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "weatherwise_completion_success_total",
            "round" => round.as_str(),
            "provider" => response.provider.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "weatherwise_completion_duration_seconds",
            "round" => round.as_str(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
        metrics::counter!(
            "weatherwise_completion_tokens_total",
            "round" => round.as_str()
        )
        .increment(u64::from(response.usage.total_tokens));
    }

    fn on_completion_failure(
        &self,
        _run_id: &RunId,
        round: CompletionRound,
        error: &ChatError,
        elapsed: Duration,
    ) {
        let error_kind = match error.provider_kind() {
            Some(kind) => format!("{kind:?}"),
            None => format!("{:?}", error.kind),
        };

        metrics::counter!(
            "weatherwise_completion_failure_total",
            "round" => round.as_str(),
            "error_kind" => error_kind
        )
        .increment(1);
        metrics::histogram!(
            "weatherwise_completion_duration_seconds",
            "round" => round.as_str(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_diagnostic(&self, _run_id: &RunId, diagnostic: &Diagnostic) {
        metrics::counter!(
            "weatherwise_run_diagnostic_total",
            "code" => diagnostic.code()
        )
        .increment(1);
    }

    fn on_run_complete(&self, _run_id: &RunId, run: &ChatRun) {
        metrics::counter!(
            "weatherwise_run_complete_total",
            "outcome" => run.outcome().as_str()
        )
        .increment(1);
        metrics::histogram!("weatherwise_run_conversation_length")
            .record(run.conversation().len() as f64);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "weatherwise_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "weatherwise_tool_execution_success_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "weatherwise_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "weatherwise_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "weatherwise_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
