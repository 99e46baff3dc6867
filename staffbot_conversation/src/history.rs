//! History window management.

use staffbot_core::ChatMessage;

/// Cap `messages` at `max_entries`, dropping the oldest first. The cap
/// applied after each turn is `2 × max_history_messages` — one user and one
/// assistant entry per turn — which bounds the context sent to the fallback
/// provider.
pub fn truncate_oldest(messages: &mut Vec<ChatMessage>, max_entries: usize) {
    if messages.len() > max_entries {
        let excess = messages.len() - max_entries;
        messages.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffbot_core::Role;

    fn numbered(count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                content: format!("Message {i}"),
            })
            .collect()
    }

    #[test]
    fn keeps_the_most_recent_entries_in_order() {
        let mut messages = numbered(25);
        truncate_oldest(&mut messages, 20);

        assert_eq!(messages.len(), 20);
        assert_eq!(messages[0].content, "Message 5");
        assert_eq!(messages[19].content, "Message 24");
    }

    #[test]
    fn shorter_history_is_untouched() {
        let mut messages = numbered(7);
        truncate_oldest(&mut messages, 20);
        assert_eq!(messages.len(), 7);
    }

    #[test]
    fn zero_cap_empties_the_history() {
        let mut messages = numbered(3);
        truncate_oldest(&mut messages, 0);
        assert!(messages.is_empty());
    }
}
