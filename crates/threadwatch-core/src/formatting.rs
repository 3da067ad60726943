//! Discord message formatting — deep links, mentions, and the two
//! notification templates.
//!
//! Output is Discord-flavoured Markdown:
//! - `*[name](link)*` renders the thread name as an italic link
//! - `<@id>` renders a user mention

use crate::bus::types::ThreadCreatedEvent;
use crate::config::schema::MessageTemplate;

/// Web client base for channel deep links.
const DISCORD_CHANNELS_BASE: &str = "https://discord.com/channels";

/// Deep link to a thread.
///
/// A thread is its own channel, so the thread ID fills both the channel and
/// the message slot.
pub fn thread_link(event: &ThreadCreatedEvent) -> String {
    format!(
        "{DISCORD_CHANNELS_BASE}/{}/{}/{}",
        event.guild_id, event.thread_id, event.thread_id
    )
}

/// Mention token for a user ID.
pub fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Concatenated mention tokens, or an empty string for no users.
pub fn mentions(user_ids: &[String]) -> String {
    user_ids.iter().map(|id| mention(id)).collect()
}

/// Render the notification body for an event.
pub fn render(template: MessageTemplate, event: &ThreadCreatedEvent) -> String {
    let link = thread_link(event);
    match template {
        MessageTemplate::Thread => format!("New thread: *[{}]({link})*", event.name),
        MessageTemplate::Vote => {
            format!("New proposal up for a vote: *[{}]({link})*", event.name)
        }
    }
}

/// Append mentions to a rendered body, separated by a single space.
pub fn with_mentions(body: &str, user_ids: &[String]) -> String {
    if user_ids.is_empty() {
        body.to_string()
    } else {
        format!("{body} {}", mentions(user_ids))
    }
}
