//! Client-side session core for a WhatsApp-bridge desktop messenger.
//!
//! This crate owns the connection lifecycle state machine, the pairing
//! handshake (QR code or phone pairing code), and the locally cached
//! chat/message view that reacts to push events from the bridge.

/// Backend request/response seam and the scripted in-memory backend.
pub mod backend;
/// Bridge event fan-out channel.
pub mod channel;
/// Chat list and per-chat message cache.
pub mod chats;
/// Connection lifecycle state machine.
pub mod connection;
/// Stable session error types.
pub mod error;
/// Session façade exposed to the UI layer.
pub mod session;
/// Display-time formatting helpers.
pub mod timefmt;
/// Boundary data types (chats, messages, bridge events).
pub mod types;
/// Derived selection/search/draft view state.
pub mod view;

pub use backend::{BackendClient, InMemoryBackend};
pub use channel::{BridgeChannels, EventStream};
pub use chats::{ChatStore, DEFAULT_MESSAGE_FETCH_LIMIT};
pub use connection::{ConnectionController, FollowUp};
pub use error::{SessionError, SessionErrorCategory};
pub use session::{Session, SessionConfig};
pub use types::{
    BridgeEvent, Chat, ConnectionPhase, ConnectionStatus, Message, MessageKind, RemoteChat,
    RemoteMessage,
};
pub use view::ViewState;
