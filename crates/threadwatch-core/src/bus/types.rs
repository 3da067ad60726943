//! Bus event types — the inbound thread event and the outbound notification.

/// A new thread opened under a parent channel.
///
/// Produced by the gateway subscriber; the notifier only reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadCreatedEvent {
    /// Guild the thread lives in.
    pub guild_id: String,
    /// Channel the thread was opened under.
    pub parent_id: String,
    /// Thread ID (threads are channels, so this is also its channel ID).
    pub thread_id: String,
    /// Display name of the thread.
    pub name: String,
}

impl ThreadCreatedEvent {
    /// Create a new thread event.
    pub fn new(
        guild_id: impl Into<String>,
        parent_id: impl Into<String>,
        thread_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        ThreadCreatedEvent {
            guild_id: guild_id.into(),
            parent_id: parent_id.into(),
            thread_id: thread_id.into(),
            name: name.into(),
        }
    }
}

/// A formatted notification addressed to one destination channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Target channel ID.
    pub channel_id: String,
    /// Text content, mentions included.
    pub content: String,
}

impl OutboundMessage {
    /// Create a new outbound message.
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        OutboundMessage {
            channel_id: channel_id.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_event_creation() {
        let ev = ThreadCreatedEvent::new("G1", "C1", "T1", "Bug");

        assert_eq!(ev.guild_id, "G1");
        assert_eq!(ev.parent_id, "C1");
        assert_eq!(ev.thread_id, "T1");
        assert_eq!(ev.name, "Bug");
    }

    #[test]
    fn test_outbound_message_creation() {
        let msg = OutboundMessage::new("D1", "New thread");

        assert_eq!(msg.channel_id, "D1");
        assert_eq!(msg.content, "New thread");
    }
}
