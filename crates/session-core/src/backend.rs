use std::collections::HashMap;

use crate::{
    error::SessionError,
    types::{ConnectionStatus, RemoteChat, RemoteMessage},
};

/// Request/response API exposed by the messaging bridge.
///
/// Every call is a suspension point for the cooperative scheduler; the
/// core never holds state captured before an await across one of these
/// boundaries — callers re-check `linked` at the point of use instead.
#[allow(async_fn_in_trait)]
pub trait BackendClient {
    /// Query the current device/link status.
    async fn check_connection(&self) -> Result<ConnectionStatus, SessionError>;

    /// Silently reconnect an already-linked device.
    async fn reconnect_existing(&self) -> Result<(), SessionError>;

    /// Start a QR pairing session.
    ///
    /// The scannable payload does not come back from this call; it
    /// arrives asynchronously as a `BridgeEvent::QrIssued`.
    async fn start_qr_pairing(&self) -> Result<(), SessionError>;

    /// Request a pairing code keyed by phone number.
    async fn request_pairing_code(&self, phone: &str) -> Result<String, SessionError>;

    /// Fetch the ordered chat list.
    async fn fetch_chats(&self) -> Result<Vec<RemoteChat>, SessionError>;

    /// Fetch up to `limit` recent messages for a chat, oldest first.
    async fn fetch_messages(
        &self,
        remote_id: &str,
        limit: u16,
    ) -> Result<Vec<RemoteMessage>, SessionError>;
}

/// Deterministic scripted backend used by the smoke binary and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    status: ConnectionStatus,
    reconnect_ok: bool,
    qr_pairing_ok: bool,
    pairing_code: Option<String>,
    chats: Option<Vec<RemoteChat>>,
    messages: HashMap<String, Vec<RemoteMessage>>,
    fail_message_fetch: bool,
}

impl InMemoryBackend {
    /// Report an already-linked device from the connection check.
    pub fn with_linked_device(
        mut self,
        device_id: impl Into<String>,
        push_name: impl Into<String>,
    ) -> Self {
        self.status = ConnectionStatus {
            connected: true,
            device_id: Some(device_id.into()),
            push_name: Some(push_name.into()),
        };
        self
    }

    /// Let `reconnect_existing` succeed.
    pub fn with_reconnect_ok(mut self) -> Self {
        self.reconnect_ok = true;
        self
    }

    /// Let `start_qr_pairing` succeed.
    pub fn with_qr_pairing(mut self) -> Self {
        self.qr_pairing_ok = true;
        self
    }

    /// Serve a fixed pairing code for phone pairing requests.
    pub fn with_pairing_code(mut self, code: impl Into<String>) -> Self {
        self.pairing_code = Some(code.into());
        self
    }

    /// Serve a fixed chat list; without this, `fetch_chats` fails.
    pub fn with_chats(mut self, chats: Vec<RemoteChat>) -> Self {
        self.chats = Some(chats);
        self
    }

    /// Serve fixed message history for one chat.
    pub fn with_messages(mut self, remote_id: impl Into<String>, items: Vec<RemoteMessage>) -> Self {
        self.messages.insert(remote_id.into(), items);
        self
    }

    /// Force `fetch_messages` to fail for every chat.
    pub fn failing_message_fetch(mut self) -> Self {
        self.fail_message_fetch = true;
        self
    }
}

impl BackendClient for InMemoryBackend {
    async fn check_connection(&self) -> Result<ConnectionStatus, SessionError> {
        Ok(self.status.clone())
    }

    async fn reconnect_existing(&self) -> Result<(), SessionError> {
        if self.reconnect_ok {
            Ok(())
        } else {
            Err(SessionError::connectivity(
                "reconnect_failed",
                "no existing device session to reconnect",
            ))
        }
    }

    async fn start_qr_pairing(&self) -> Result<(), SessionError> {
        if self.qr_pairing_ok {
            Ok(())
        } else {
            Err(SessionError::connectivity(
                "pairing_start_failed",
                "bridge rejected new pairing session",
            ))
        }
    }

    async fn request_pairing_code(&self, phone: &str) -> Result<String, SessionError> {
        self.pairing_code.clone().ok_or_else(|| {
            SessionError::connectivity(
                "pairing_code_failed",
                format!("no pairing code available for {phone}"),
            )
        })
    }

    async fn fetch_chats(&self) -> Result<Vec<RemoteChat>, SessionError> {
        self.chats
            .clone()
            .ok_or_else(|| SessionError::data("chat_fetch_failed", "chat list unavailable"))
    }

    async fn fetch_messages(
        &self,
        remote_id: &str,
        limit: u16,
    ) -> Result<Vec<RemoteMessage>, SessionError> {
        if self.fail_message_fetch {
            return Err(SessionError::data(
                "message_fetch_failed",
                format!("history unavailable for {remote_id}"),
            ));
        }

        let mut items = self.messages.get(remote_id).cloned().unwrap_or_default();
        let limit = limit.max(1) as usize;
        if items.len() > limit {
            let excess = items.len() - limit;
            items.drain(0..excess);
        }
        Ok(items)
    }
}
