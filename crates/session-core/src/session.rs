use chrono::Local;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::{
    backend::BackendClient,
    channel::EventStream,
    chats::{ChatStore, DEFAULT_MESSAGE_FETCH_LIMIT},
    connection::{ConnectionController, FollowUp},
    timefmt,
    types::{BridgeEvent, ConnectionPhase},
    view::ViewState,
};

/// Runtime tuning for the session core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bounded count for message history fetches.
    pub message_fetch_limit: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            message_fetch_limit: DEFAULT_MESSAGE_FETCH_LIMIT,
        }
    }
}

/// Session façade tying the connection controller, chat store and view
/// state together behind the operations the UI layer is allowed to call.
///
/// All state lives behind read accessors; mutation happens only through
/// the documented operations and the bridge event reducer.
#[derive(Debug)]
pub struct Session<B: BackendClient> {
    backend: B,
    connection: ConnectionController,
    chats: ChatStore,
    view: ViewState,
    config: SessionConfig,
    last_error: Option<String>,
}

impl<B: BackendClient> Session<B> {
    /// Create a session over a backend handle.
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            connection: ConnectionController::default(),
            chats: ChatStore::default(),
            view: ViewState::default(),
            config,
            last_error: None,
        }
    }

    /// Read-only connection state.
    pub fn connection(&self) -> &ConnectionController {
        &self.connection
    }

    /// Read-only chat store.
    pub fn chats(&self) -> &ChatStore {
        &self.chats
    }

    /// Read-only selection/search/draft state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Most recent diagnostic surfaced to the UI, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Probe for an existing device session; on reconnect, refresh chats.
    pub async fn check_existing_connection(&mut self) {
        if let Some(err) = self.connection.check_existing_connection(&self.backend).await {
            self.last_error = Some(err.to_string());
        }
        if self.connection.phase() == ConnectionPhase::Connected {
            self.refresh_chats().await;
        }
    }

    /// Start a QR pairing attempt.
    pub async fn link_with_qr(&mut self) {
        match self.connection.link_with_qr(&self.backend).await {
            Ok(()) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    /// Request a phone pairing code; read it back via
    /// [`ConnectionController::pairing_code`].
    pub async fn link_with_phone(&mut self, phone: &str) {
        match self.connection.link_with_phone(&self.backend, phone).await {
            Ok(()) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    /// Locally disconnect without notifying the backend.
    pub fn disconnect(&mut self) {
        self.connection.disconnect();
    }

    /// Select a chat, clear the draft, and fetch its recent messages.
    ///
    /// Selection and message loading are coupled so switching chats
    /// always attempts a fresh fetch.
    pub async fn select_chat(&mut self, local_id: u32) {
        self.view.select(local_id);
        self.chats
            .load_messages(
                &self.backend,
                self.connection.linked(),
                local_id,
                self.config.message_fetch_limit,
            )
            .await;
    }

    /// Append an outbound message to the active chat and clear the draft.
    /// Blank or whitespace-only text is a no-op.
    pub fn send_message(&mut self, text: &str) {
        let time_label = timefmt::compose_time(Local::now().naive_local());
        if self
            .chats
            .send_message(self.view.selected_id(), text, &time_label)
        {
            self.view.clear_draft();
        }
    }

    /// Replace the search query.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.set_query(query);
    }

    /// Replace the compose draft.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.view.set_draft(draft);
    }

    /// Feed one bridge event through the connection reducer and run the
    /// follow-up it requests.
    pub async fn handle_event(&mut self, event: BridgeEvent) {
        if let BridgeEvent::BackendError { info } = &event {
            self.last_error = Some(info.clone());
        }

        match self.connection.apply_event(&event) {
            Some(FollowUp::RefreshChats) => self.refresh_chats().await,
            Some(FollowUp::PurgeCache) => {
                debug!("purging chat store after session loss");
                self.chats.clear();
            }
            None => {}
        }
    }

    /// Consume a bridge event stream until it closes.
    ///
    /// Subscribes once for the session lifetime; lagged receivers skip
    /// the missed events and keep going.
    pub async fn run(&mut self, mut events: EventStream) {
        debug!("session event loop started");
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream lagged; continuing");
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("session event loop exiting");
    }

    async fn refresh_chats(&mut self) {
        self.chats
            .load_chats(&self.backend, self.connection.linked())
            .await;
    }
}
