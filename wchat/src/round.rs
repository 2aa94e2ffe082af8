//! Two-phase round protocol states.
//!
//! ```rust
//! use wchat::RoundState;
//!
//! let state = RoundState::AwaitingFirstResponse
//!     .transition(RoundState::ExecutingTools)
//!     .expect("tools follow the first response");
//!
//! assert!(state.transition(RoundState::ExecutingTools).is_err());
//! ```

use std::fmt::{Display, Formatter};

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    #[default]
    AwaitingFirstResponse,
    ExecutingTools,
    AwaitingSecondResponse,
    Done,
}

impl RoundState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingFirstResponse => "awaiting_first_response",
            Self::ExecutingTools => "executing_tools",
            Self::AwaitingSecondResponse => "awaiting_second_response",
            Self::Done => "done",
        }
    }

    pub fn can_transition_to(self, next: RoundState) -> bool {
        matches!(
            (self, next),
            (Self::AwaitingFirstResponse, Self::Done)
                | (Self::AwaitingFirstResponse, Self::ExecutingTools)
                | (Self::ExecutingTools, Self::AwaitingSecondResponse)
                | (Self::AwaitingSecondResponse, Self::Done)
        )
    }

    pub fn transition(self, next: RoundState) -> Result<RoundState, ChatError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ChatError::protocol(format!(
                "illegal round transition {} -> {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }

    /// Which completion the state is waiting on, if any.
    pub fn pending_completion(self) -> Option<CompletionRound> {
        match self {
            Self::AwaitingFirstResponse => Some(CompletionRound::First),
            Self::AwaitingSecondResponse => Some(CompletionRound::Second),
            Self::ExecutingTools | Self::Done => None,
        }
    }
}

impl Display for RoundState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two completion calls a run can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionRound {
    First,
    Second,
}

impl CompletionRound {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

impl Display for CompletionRound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
