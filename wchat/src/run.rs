//! Result of one conversation run.

use wcommon::RunId;
use wprovider::Message;

use crate::{ChatError, Conversation, Diagnostic, RoundState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The final assistant message.
    Answered(Message),
    /// A completion call failed; nothing further was attempted.
    NoResponse(ChatError),
    /// A tool failure ended the run under the abort policy, or the
    /// conversation log refused an append.
    Failed(ChatError),
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered(_) => "answered",
            Self::NoResponse(_) => "no_response",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }

    pub fn error(&self) -> Option<&ChatError> {
        match self {
            Self::Answered(_) => None,
            Self::NoResponse(error) | Self::Failed(error) => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRun {
    run_id: RunId,
    conversation: Conversation,
    outcome: RunOutcome,
    diagnostics: Vec<Diagnostic>,
    state: RoundState,
}

impl ChatRun {
    pub(crate) fn new(
        run_id: RunId,
        conversation: Conversation,
        outcome: RunOutcome,
        diagnostics: Vec<Diagnostic>,
        state: RoundState,
    ) -> Self {
        Self {
            run_id,
            conversation,
            outcome,
            diagnostics,
            state,
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Last state the round protocol reached.
    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn answer(&self) -> Option<&Message> {
        match &self.outcome {
            RunOutcome::Answered(message) => Some(message),
            _ => None,
        }
    }

    /// Content of the answered message, if any.
    pub fn answer_text(&self) -> Option<&str> {
        self.answer().and_then(|message| message.content.as_deref())
    }

    pub fn into_parts(self) -> (Conversation, RunOutcome, Vec<Diagnostic>) {
        (self.conversation, self.outcome, self.diagnostics)
    }
}
