//! Lifecycle hooks for conversation runs.
//!
//! ```rust
//! use wchat::{ChatRunHooks, NoopChatRunHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ChatRunHooks) {}
//!
//! assert_hooks_trait(&NoopChatRunHooks);
//! ```

use std::time::Duration;

use wcommon::RunId;
use wprovider::ModelResponse;

use crate::{ChatError, ChatRun, CompletionRound, Diagnostic};

pub trait ChatRunHooks: Send + Sync {
    fn on_completion_start(&self, _run_id: &RunId, _round: CompletionRound) {}

    fn on_completion_success(
        &self,
        _run_id: &RunId,
        _round: CompletionRound,
        _response: &ModelResponse,
        _elapsed: Duration,
    ) {
    }

    fn on_completion_failure(
        &self,
        _run_id: &RunId,
        _round: CompletionRound,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
    }

    fn on_diagnostic(&self, _run_id: &RunId, _diagnostic: &Diagnostic) {}

    fn on_run_complete(&self, _run_id: &RunId, _run: &ChatRun) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatRunHooks;

impl ChatRunHooks for NoopChatRunHooks {}
