//! Item models yielded by engine paginators.

use chrono::{DateTime, Utc};

use crate::types::LabelScope;

/// Summary of a conversation as yielded by a conversation paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    /// Engine-assigned conversation identifier.
    pub id: String,
    /// Subject line.
    pub subject: String,
    /// Preview snippet.
    pub snippet: String,
    /// Labels attached to the conversation.
    pub labels: Vec<LabelScope>,
    /// Number of messages in the conversation.
    pub message_count: u32,
    /// Whether the conversation has unread messages.
    pub is_unread: bool,
    /// Timestamp of the most recent message.
    pub last_message_at: DateTime<Utc>,
}

/// Summary of a single message as yielded by a message paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    /// Engine-assigned message identifier.
    pub id: String,
    /// Conversation this message belongs to.
    pub conversation_id: String,
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub from: String,
    /// Preview snippet of the message body.
    pub snippet: String,
    /// Whether the message has been read.
    pub is_unread: bool,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}
