//! Conversation state and the single tool-round chat protocol.
//!
//! A run sends the user text to the model, executes the tool calls of the
//! first response (if any) and asks the model once more. Tool calls in the
//! second response are recorded but never executed.

mod conversation;
mod diagnostics;
mod error;
mod hooks;
mod round;
mod run;
mod service;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatRun, ChatRunHooks, ChatService, ChatServiceBuilder,
        Conversation, Diagnostic, RoundState, RunOutcome, ToolFailurePolicy,
    };
    pub use wcommon::RunId;
    pub use wtooling::{
        DefaultToolRuntime, FunctionTable, ToolCatalog, ToolError, ToolErrorKind, ToolRegistry,
        ToolRuntime,
    };
}

pub use conversation::Conversation;
pub use diagnostics::Diagnostic;
pub use error::{ChatError, ChatErrorKind, ChatErrorSource};
pub use hooks::{ChatRunHooks, NoopChatRunHooks};
pub use round::{CompletionRound, RoundState};
pub use run::{ChatRun, RunOutcome};
pub use service::{ChatService, ChatServiceBuilder, DEFAULT_MODEL, ToolFailurePolicy};
pub use wcommon::RunId;
