use crate::{
    chats::ChatStore,
    types::{Chat, Message},
};

/// Selection, search and draft state layered over the chat store.
///
/// Everything exposed here is derived at read time from the current
/// store contents; nothing is cached independently.
#[derive(Debug, Clone)]
pub struct ViewState {
    selected_id: u32,
    query: String,
    draft: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_id: 1,
            query: String::new(),
            draft: String::new(),
        }
    }
}

impl ViewState {
    /// Currently selected chat identifier.
    pub fn selected_id(&self) -> u32 {
        self.selected_id
    }

    /// Current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current compose draft.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Select a chat and clear the compose draft.
    pub fn select(&mut self, local_id: u32) {
        self.selected_id = local_id;
        self.draft.clear();
    }

    /// Replace the search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Replace the compose draft.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Clear the compose draft.
    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// The selected chat, or `None` when the selection points at a chat
    /// that no longer exists (for example after a cache purge).
    pub fn active_chat<'a>(&self, store: &'a ChatStore) -> Option<&'a Chat> {
        store.chat(self.selected_id)
    }

    /// Messages of the selected chat, empty when nothing is cached.
    ///
    /// Selection is applied at read time, so a late cache write for a
    /// chat that is no longer selected stays inert.
    pub fn active_messages<'a>(&self, store: &'a ChatStore) -> &'a [Message] {
        store.messages_for(self.selected_id)
    }

    /// Sum of unread counts across all chats.
    pub fn total_unread(&self, store: &ChatStore) -> u32 {
        store.chats().iter().map(|chat| chat.unread).sum()
    }

    /// Chats whose name or preview contains the query, case-insensitively.
    /// An empty query returns the full list in original order.
    pub fn filtered_chats<'a>(&self, store: &'a ChatStore) -> Vec<&'a Chat> {
        if self.query.is_empty() {
            return store.chats().iter().collect();
        }
        let needle = self.query.to_lowercase();
        store
            .chats()
            .iter()
            .filter(|chat| {
                chat.name.to_lowercase().contains(&needle)
                    || chat.last_preview.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::types::{MessageKind, RemoteChat, RemoteMessage};

    fn remote_chat(remote_id: &str, name: &str, preview: &str, unread: u32) -> RemoteChat {
        RemoteChat {
            remote_id: remote_id.to_owned(),
            name: name.to_owned(),
            last_preview: preview.to_owned(),
            last_time: "10:30".to_owned(),
            unread,
            is_group: false,
        }
    }

    fn remote_message(text: &str) -> RemoteMessage {
        RemoteMessage {
            author: "Alice".to_owned(),
            text: text.to_owned(),
            time: "10:31".to_owned(),
            mine: false,
            kind: MessageKind::Text,
        }
    }

    async fn loaded_store() -> ChatStore {
        let backend = InMemoryBackend::default().with_chats(vec![
            remote_chat("a@s.whatsapp.net", "Alice Smith", "see you soon", 2),
            remote_chat("b@s.whatsapp.net", "Bob", "HELLO there", 3),
        ]);
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;
        store
    }

    #[tokio::test]
    async fn empty_query_returns_full_list_in_order() {
        let store = loaded_store().await;
        let view = ViewState::default();

        let filtered = view.filtered_chats(&store);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].name, "Alice Smith");
        assert_eq!(filtered[1].name, "Bob");
    }

    #[tokio::test]
    async fn filter_matches_name_or_preview_case_insensitively() {
        let store = loaded_store().await;
        let mut view = ViewState::default();

        view.set_query("alice");
        assert_eq!(view.filtered_chats(&store).len(), 1);

        view.set_query("hello");
        let filtered = view.filtered_chats(&store);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Bob");

        view.set_query("no such chat");
        assert!(view.filtered_chats(&store).is_empty());
    }

    #[tokio::test]
    async fn total_unread_is_recomputed_from_the_list() {
        let store = loaded_store().await;
        let view = ViewState::default();
        assert_eq!(view.total_unread(&store), 5);
    }

    #[tokio::test]
    async fn stale_selection_yields_no_active_chat() {
        let mut store = loaded_store().await;
        let mut view = ViewState::default();
        view.select(2);
        assert!(view.active_chat(&store).is_some());

        store.clear();
        assert!(view.active_chat(&store).is_none());
        assert!(view.active_messages(&store).is_empty());
    }

    #[tokio::test]
    async fn select_clears_draft() {
        let mut view = ViewState::default();
        view.set_draft("half-typed");
        view.select(2);
        assert_eq!(view.draft(), "");
        assert_eq!(view.selected_id(), 2);
    }

    #[tokio::test]
    async fn late_write_for_unselected_chat_stays_inert() {
        let backend = InMemoryBackend::default()
            .with_chats(vec![
                remote_chat("x@s.whatsapp.net", "Chat X", "x", 0),
                remote_chat("y@s.whatsapp.net", "Chat Y", "y", 0),
            ])
            .with_messages("x@s.whatsapp.net", vec![remote_message("late for X")])
            .with_messages("y@s.whatsapp.net", vec![remote_message("current for Y")]);
        let mut store = ChatStore::default();
        store.load_chats(&backend, true).await;

        let mut view = ViewState::default();
        view.select(2);
        store.load_messages(&backend, true, 2, 50).await;

        // A fetch started while chat X was selected resolves only now.
        store.load_messages(&backend, true, 1, 50).await;

        let active = view.active_messages(&store);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].body, "current for Y");
    }
}
