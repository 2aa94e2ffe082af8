//! Append-only message log for one conversation run.
//!
//! Callers outside this crate can read the log but never change it:
//!
//! ```rust
//! use wchat::Conversation;
//!
//! let conversation = Conversation::default();
//! assert!(conversation.is_empty());
//! assert!(conversation.last().is_none());
//! ```

use std::collections::HashSet;

use wprovider::{Message, Role};

use crate::ChatError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    requested: HashSet<String>,
    answered: HashSet<String>,
}

impl Conversation {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Tool-role messages in append order.
    pub fn tool_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|message| message.role == Role::Tool)
    }

    /// Whether `tool_call_id` was requested by an assistant message and has
    /// not been answered yet.
    pub fn awaits_tool_result(&self, tool_call_id: &str) -> bool {
        self.requested.contains(tool_call_id) && !self.answered.contains(tool_call_id)
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub(crate) fn append(&mut self, message: Message) -> Result<(), ChatError> {
        message
            .validate()
            .map_err(|err| ChatError::protocol(err.message))?;

        if message.role == Role::Tool {
            let tool_call_id = message.tool_call_id.as_deref().unwrap_or_default();
            if !self.requested.contains(tool_call_id) {
                return Err(ChatError::protocol(format!(
                    "tool result '{tool_call_id}' answers no requested tool call"
                )));
            }

            if !self.answered.insert(tool_call_id.to_string()) {
                return Err(ChatError::protocol(format!(
                    "tool call '{tool_call_id}' was already answered"
                )));
            }
        }

        self.requested
            .extend(message.tool_calls.iter().map(|call| call.id.clone()));
        self.messages.push(message);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
