use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    backend::BackendClient,
    types::{Chat, Message, MessageKind, RemoteChat, RemoteMessage},
};

/// Default bounded count for message history fetches.
pub const DEFAULT_MESSAGE_FETCH_LIMIT: u16 = 50;

const PLACEHOLDER_NAME: &str = "Connect WhatsApp";
const PLACEHOLDER_PREVIEW: &str = "Please connect to WhatsApp first";
const FALLBACK_MESSAGE_TEXT: &str = "Please connect to WhatsApp to see real messages";
const OUTBOUND_AUTHOR: &str = "Me";

/// Chat list plus per-chat message caches.
///
/// Cache entries are keyed by chat `local_id`, created on first load,
/// replaced wholesale on reload, and purged entirely on session loss.
#[derive(Debug, Clone, Default)]
pub struct ChatStore {
    chats: Vec<Chat>,
    messages: HashMap<u32, Vec<Message>>,
}

impl ChatStore {
    /// Current chat list in load order.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Resolve a chat by its session-scoped identifier.
    pub fn chat(&self, local_id: u32) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.local_id == local_id)
    }

    /// Cached messages for a chat, empty when nothing is cached.
    pub fn messages_for(&self, local_id: u32) -> &[Message] {
        self.messages
            .get(&local_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Drop the chat list and every cached message entry.
    pub fn clear(&mut self) {
        self.chats.clear();
        self.messages.clear();
    }

    /// Replace the chat list from the backend, or from fallback content.
    ///
    /// Not linked: a single placeholder entry prompting connection, with
    /// no backend call. Linked but failing: a fixed two-entry demo set so
    /// the UI is never empty; the failure is still logged.
    pub async fn load_chats(&mut self, backend: &impl BackendClient, linked: bool) {
        if !linked {
            self.chats = vec![placeholder_chat()];
            return;
        }

        match backend.fetch_chats().await {
            Ok(records) => {
                self.chats = records
                    .into_iter()
                    .enumerate()
                    .map(|(index, record)| map_chat(index as u32 + 1, record))
                    .collect();
                debug!(chat_count = self.chats.len(), "chat list replaced from backend");
            }
            Err(err) => {
                warn!(error = %err, "chat fetch failed; substituting demo chats");
                self.chats = demo_chats();
            }
        }
    }

    /// Replace one chat's message cache entry from the backend.
    ///
    /// No-op unless linked, the chat resolves, and it has a durable
    /// backend identifier. A fetch failure substitutes a single synthetic
    /// message rather than leaving the entry empty.
    pub async fn load_messages(
        &mut self,
        backend: &impl BackendClient,
        linked: bool,
        local_id: u32,
        limit: u16,
    ) {
        if !linked {
            return;
        }
        let Some(chat) = self.chat(local_id) else {
            debug!(local_id, "message load skipped for unknown chat");
            return;
        };
        if chat.remote_id.is_empty() {
            debug!(local_id, "message load skipped for placeholder chat");
            return;
        }
        let remote_id = chat.remote_id.clone();

        match backend.fetch_messages(&remote_id, limit).await {
            Ok(records) => {
                let items: Vec<Message> = records
                    .into_iter()
                    .enumerate()
                    .map(|(index, record)| map_message(index as u32 + 1, record))
                    .collect();
                debug!(local_id, message_count = items.len(), "message cache replaced");
                self.messages.insert(local_id, items);
            }
            Err(err) => {
                warn!(local_id, error = %err, "message fetch failed; substituting placeholder");
                self.messages.insert(local_id, vec![fallback_message()]);
            }
        }
    }

    /// Append an outbound message to a chat's cache entry.
    ///
    /// Local-only: outbound delivery belongs to an external collaborator.
    /// Blank or whitespace-only text is a no-op. Returns whether a message
    /// was appended; on append the chat's preview and timestamp are updated
    /// to reflect the new last message.
    pub fn send_message(&mut self, local_id: u32, text: &str, time_label: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let entry = self.messages.entry(local_id).or_default();
        entry.push(Message {
            local_id: entry.len() as u32 + 1,
            author: OUTBOUND_AUTHOR.to_owned(),
            body: text.to_owned(),
            time: time_label.to_owned(),
            mine: true,
            kind: MessageKind::Text,
        });

        if let Some(chat) = self.chats.iter_mut().find(|chat| chat.local_id == local_id) {
            chat.last_preview = text.to_owned();
            chat.last_time = time_label.to_owned();
        }
        true
    }
}

fn map_chat(local_id: u32, record: RemoteChat) -> Chat {
    Chat {
        local_id,
        remote_id: record.remote_id,
        name: record.name,
        last_preview: record.last_preview,
        last_time: record.last_time,
        unread: record.unread,
        is_group: record.is_group,
    }
}

fn map_message(local_id: u32, record: RemoteMessage) -> Message {
    Message {
        local_id,
        author: record.author,
        body: record.text,
        time: record.time,
        mine: record.mine,
        kind: record.kind,
    }
}

fn placeholder_chat() -> Chat {
    Chat {
        local_id: 1,
        remote_id: String::new(),
        name: PLACEHOLDER_NAME.to_owned(),
        last_preview: PLACEHOLDER_PREVIEW.to_owned(),
        last_time: String::new(),
        unread: 0,
        is_group: false,
    }
}

fn demo_chats() -> Vec<Chat> {
    vec![
        Chat {
            local_id: 1,
            remote_id: "demo1".to_owned(),
            name: "John Doe".to_owned(),
            last_preview: "Hello, how are you?".to_owned(),
            last_time: "10:30".to_owned(),
            unread: 2,
            is_group: false,
        },
        Chat {
            local_id: 2,
            remote_id: "demo2".to_owned(),
            name: "Family Group".to_owned(),
            last_preview: "See you tomorrow!".to_owned(),
            last_time: "09:15".to_owned(),
            unread: 0,
            is_group: true,
        },
    ]
}

fn fallback_message() -> Message {
    Message {
        local_id: 1,
        author: "Demo".to_owned(),
        body: FALLBACK_MESSAGE_TEXT.to_owned(),
        time: "00:00".to_owned(),
        mine: false,
        kind: MessageKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    fn remote_chat(remote_id: &str, name: &str, unread: u32) -> RemoteChat {
        RemoteChat {
            remote_id: remote_id.to_owned(),
            name: name.to_owned(),
            last_preview: "hi".to_owned(),
            last_time: "10:30".to_owned(),
            unread,
            is_group: false,
        }
    }

    fn remote_message(author: &str, text: &str, mine: bool) -> RemoteMessage {
        RemoteMessage {
            author: author.to_owned(),
            text: text.to_owned(),
            time: "10:31".to_owned(),
            mine,
            kind: MessageKind::Text,
        }
    }

    #[tokio::test]
    async fn unlinked_load_yields_single_placeholder() {
        let backend = InMemoryBackend::default();
        let mut store = ChatStore::default();
        store.load_chats(&backend, false).await;

        assert_eq!(store.chats().len(), 1);
        let chat = &store.chats()[0];
        assert_eq!(chat.remote_id, "");
        assert_eq!(chat.name, "Connect WhatsApp");
        assert_eq!(chat.last_preview, "Please connect to WhatsApp first");
    }

    #[tokio::test]
    async fn linked_load_assigns_one_based_local_ids() {
        let backend = InMemoryBackend::default().with_chats(vec![
            remote_chat("a@s.whatsapp.net", "Alice", 3),
            remote_chat("b@s.whatsapp.net", "Bob", 0),
        ]);
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        assert_eq!(store.chats().len(), 2);
        assert_eq!(store.chats()[0].local_id, 1);
        assert_eq!(store.chats()[0].remote_id, "a@s.whatsapp.net");
        assert_eq!(store.chats()[1].local_id, 2);
        assert_eq!(store.chats()[1].name, "Bob");
    }

    #[tokio::test]
    async fn failed_chat_fetch_falls_back_to_demo_set() {
        let backend = InMemoryBackend::default();
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        assert_eq!(store.chats().len(), 2);
        assert_eq!(store.chats()[0].name, "John Doe");
        assert_eq!(store.chats()[0].remote_id, "demo1");
        assert_eq!(store.chats()[0].unread, 2);
        assert_eq!(store.chats()[1].name, "Family Group");
        assert!(store.chats()[1].is_group);
    }

    #[tokio::test]
    async fn load_messages_for_unknown_chat_is_a_no_op() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![remote_chat("a@s.whatsapp.net", "Alice", 0)]);
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        store.load_messages(&backend, true, 99, 50).await;
        assert!(store.messages_for(99).is_empty());
    }

    #[tokio::test]
    async fn load_messages_skips_placeholder_chats() {
        let backend = InMemoryBackend::default();
        let mut store = ChatStore::default();
        store.load_chats(&backend, false).await;

        store.load_messages(&backend, true, 1, 50).await;
        assert!(store.messages_for(1).is_empty());
    }

    #[tokio::test]
    async fn load_messages_replaces_entry_wholesale() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![remote_chat("a@s.whatsapp.net", "Alice", 0)])
            .with_messages(
                "a@s.whatsapp.net",
                vec![remote_message("Alice", "hello", false)],
            );
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        store.send_message(1, "stale local entry", "09:00");
        store.load_messages(&backend, true, 1, 50).await;

        let items = store.messages_for(1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].local_id, 1);
        assert_eq!(items[0].body, "hello");
        assert!(!items[0].mine);
    }

    #[tokio::test]
    async fn failed_message_fetch_substitutes_synthetic_entry() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![remote_chat("a@s.whatsapp.net", "Alice", 0)])
            .failing_message_fetch();
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        store.load_messages(&backend, true, 1, 50).await;
        let items = store.messages_for(1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].author, "Demo");
        assert_eq!(items[0].body, "Please connect to WhatsApp to see real messages");
        assert_eq!(items[0].time, "00:00");
    }

    #[tokio::test]
    async fn blank_send_leaves_cache_and_preview_untouched() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![remote_chat("a@s.whatsapp.net", "Alice", 0)]);
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;
        let preview_before = store.chats()[0].last_preview.clone();

        assert!(!store.send_message(1, "", "10:00"));
        assert!(!store.send_message(1, "   ", "10:00"));
        assert!(store.messages_for(1).is_empty());
        assert_eq!(store.chats()[0].last_preview, preview_before);
    }

    #[tokio::test]
    async fn send_appends_and_updates_preview() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![remote_chat("a@s.whatsapp.net", "Alice", 0)]);
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        assert!(store.send_message(1, "on my way", "12:05"));
        let items = store.messages_for(1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].author, "Me");
        assert!(items[0].mine);
        assert_eq!(items[0].body, "on my way");

        let chat = &store.chats()[0];
        assert_eq!(chat.last_preview, "on my way");
        assert_eq!(chat.last_time, "12:05");
    }

    #[tokio::test]
    async fn clear_purges_chats_and_every_cache_entry() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![remote_chat("a@s.whatsapp.net", "Alice", 0)])
            .with_messages(
                "a@s.whatsapp.net",
                vec![remote_message("Alice", "hello", false)],
            );
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;
        store.load_messages(&backend, true, 1, 50).await;

        store.clear();
        assert!(store.chats().is_empty());
        assert!(store.messages_for(1).is_empty());
    }
}
