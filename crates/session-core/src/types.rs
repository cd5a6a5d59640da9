use serde::{Deserialize, Serialize};

/// Connection lifecycle phase reported to the UI.
///
/// `Checking` and `Connecting` are transient; `Connected` and
/// `Disconnected` are the stable rest states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Startup probe for an existing device session is running.
    Checking,
    /// No live session; pairing artifacts may be visible.
    Disconnected,
    /// A pairing attempt (QR or phone code) has been started.
    Connecting,
    /// A session to the messaging network is established.
    Connected,
}

/// Device status returned by the backend connection check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionStatus {
    /// Whether the backend holds credentials for a linked device.
    pub connected: bool,
    /// Durable device identifier when linked.
    pub device_id: Option<String>,
    /// Display name registered for the device when linked.
    pub push_name: Option<String>,
}

/// Message kind tag carried on both remote records and cached messages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageKind {
    /// Plain text message.
    #[default]
    Text,
    /// Image attachment.
    Image,
    /// Audio or voice note.
    Audio,
    /// Video attachment.
    Video,
    /// Document attachment.
    Document,
}

/// Chat record as delivered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteChat {
    /// Durable backend identifier (a JID).
    pub remote_id: String,
    /// Display name.
    pub name: String,
    /// Preview text of the last message.
    pub last_preview: String,
    /// Display-formatted last-activity timestamp.
    pub last_time: String,
    /// Unread message count.
    pub unread: u32,
    /// Whether the chat is a group.
    pub is_group: bool,
}

/// Message record as delivered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteMessage {
    /// Author display label.
    pub author: String,
    /// Message body text.
    pub text: String,
    /// Display-formatted timestamp.
    pub time: String,
    /// Whether the message was sent from this account.
    pub mine: bool,
    /// Message kind tag.
    pub kind: MessageKind,
}

/// Locally indexed chat row.
///
/// `local_id` is assigned by fetch-order position (1-based) and is only
/// stable within one load cycle; `remote_id` is the backend's durable
/// identifier and is empty for placeholder/fallback chats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Session-scoped identifier, unique within the current chat list.
    pub local_id: u32,
    /// Durable backend identifier; empty for placeholder chats.
    pub remote_id: String,
    /// Display name.
    pub name: String,
    /// Preview text of the last message.
    pub last_preview: String,
    /// Display-formatted last-activity timestamp.
    pub last_time: String,
    /// Unread message count.
    pub unread: u32,
    /// Whether the chat is a group.
    pub is_group: bool,
}

/// Locally indexed message row.
///
/// `local_id` is sequential per chat and reset on every wholesale reload
/// of that chat's cache entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Sequential per-chat identifier.
    pub local_id: u32,
    /// Author display label.
    pub author: String,
    /// Message body text.
    pub body: String,
    /// Display-formatted timestamp.
    pub time: String,
    /// Whether the message is outbound.
    pub mine: bool,
    /// Message kind tag.
    pub kind: MessageKind,
}

/// Push event delivered by the bridge.
///
/// Events arrive at-least-once and in arbitrary interleaving with
/// request/response calls; every handler must be idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A scannable pairing code was (re-)issued.
    ///
    /// The bridge re-issues codes periodically during a pairing attempt;
    /// each issuance overwrites the previous payload.
    QrIssued {
        /// Opaque payload rendered as a scannable code.
        payload: String,
    },
    /// A session to the messaging network was established.
    SessionEstablished {
        /// Human-readable detail from the bridge.
        info: String,
    },
    /// The session was lost or the device was unlinked.
    SessionLost {
        /// Human-readable detail from the bridge.
        info: String,
    },
    /// Soft backend failure that interrupts a pending pairing attempt.
    BackendError {
        /// Human-readable detail from the bridge.
        info: String,
    },
}
