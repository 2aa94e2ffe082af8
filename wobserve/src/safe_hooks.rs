//! Wrappers that keep a panicking hook from taking down a run.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use wchat::{ChatError, ChatRun, ChatRunHooks, CompletionRound, Diagnostic};
use wcommon::RunId;
use wprovider::{ModelResponse, ToolCall};
use wtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatRunHooks for SafeChatHooks<H>
where
    H: ChatRunHooks,
{
    fn on_completion_start(&self, run_id: &RunId, round: CompletionRound) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_completion_start(run_id, round)
        }));
    }

    fn on_completion_success(
        &self,
        run_id: &RunId,
        round: CompletionRound,
        response: &ModelResponse,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_completion_success(run_id, round, response, elapsed)
        }));
    }

    fn on_completion_failure(
        &self,
        run_id: &RunId,
        round: CompletionRound,
        error: &ChatError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_completion_failure(run_id, round, error, elapsed)
        }));
    }

    fn on_diagnostic(&self, run_id: &RunId, diagnostic: &Diagnostic) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_diagnostic(run_id, diagnostic)
        }));
    }

    fn on_run_complete(&self, run_id: &RunId, run: &ChatRun) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_run_complete(run_id, run)));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}

/// Fans each event out to both hook sets, in order.
pub struct CombinedHooks<A, B> {
    first: A,
    second: B,
}

impl<A, B> CombinedHooks<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> ChatRunHooks for CombinedHooks<A, B>
where
    A: ChatRunHooks,
    B: ChatRunHooks,
{
    fn on_completion_start(&self, run_id: &RunId, round: CompletionRound) {
        self.first.on_completion_start(run_id, round);
        self.second.on_completion_start(run_id, round);
    }

    fn on_completion_success(
        &self,
        run_id: &RunId,
        round: CompletionRound,
        response: &ModelResponse,
        elapsed: Duration,
    ) {
        self.first
            .on_completion_success(run_id, round, response, elapsed);
        self.second
            .on_completion_success(run_id, round, response, elapsed);
    }

    fn on_completion_failure(
        &self,
        run_id: &RunId,
        round: CompletionRound,
        error: &ChatError,
        elapsed: Duration,
    ) {
        self.first
            .on_completion_failure(run_id, round, error, elapsed);
        self.second
            .on_completion_failure(run_id, round, error, elapsed);
    }

    fn on_diagnostic(&self, run_id: &RunId, diagnostic: &Diagnostic) {
        self.first.on_diagnostic(run_id, diagnostic);
        self.second.on_diagnostic(run_id, diagnostic);
    }

    fn on_run_complete(&self, run_id: &RunId, run: &ChatRun) {
        self.first.on_run_complete(run_id, run);
        self.second.on_run_complete(run_id, run);
    }
}

impl<A, B> ToolRuntimeHooks for CombinedHooks<A, B>
where
    A: ToolRuntimeHooks,
    B: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        self.first.on_execution_start(tool_call, context);
        self.second.on_execution_start(tool_call, context);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        self.first
            .on_execution_success(tool_call, context, result, elapsed);
        self.second
            .on_execution_success(tool_call, context, result, elapsed);
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        self.first
            .on_execution_failure(tool_call, context, error, elapsed);
        self.second
            .on_execution_failure(tool_call, context, error, elapsed);
    }
}
