use tracing::{debug, warn};

use crate::{
    backend::BackendClient,
    error::SessionError,
    types::{BridgeEvent, ConnectionPhase},
};

/// Follow-up action the session must run after an event transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Reload the chat list from the backend.
    RefreshChats,
    /// Drop the chat list and every cached message entry.
    PurgeCache,
}

/// Owns the connection phase, pairing artifacts, and the `linked` flag.
///
/// All mutation goes through the operations and the event reducer below;
/// every write is an unconditional overwrite so that events and calls can
/// interleave in any order.
#[derive(Debug, Clone)]
pub struct ConnectionController {
    phase: ConnectionPhase,
    qr_payload: String,
    pairing_code: String,
    phone_number: String,
    linked: bool,
}

impl Default for ConnectionController {
    fn default() -> Self {
        Self {
            phase: ConnectionPhase::Checking,
            qr_payload: String::new(),
            pairing_code: String::new(),
            phone_number: String::new(),
            linked: false,
        }
    }
}

impl ConnectionController {
    /// Current lifecycle phase.
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Most recently issued scannable pairing payload, empty when none.
    pub fn qr_payload(&self) -> &str {
        &self.qr_payload
    }

    /// Pairing code issued for phone pairing, empty when none.
    pub fn pairing_code(&self) -> &str {
        &self.pairing_code
    }

    /// Last phone number submitted for pairing, kept for UI redisplay.
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// True iff a session reached connected and was not since explicitly
    /// disconnected. Selects the live data source in the chat store.
    pub fn linked(&self) -> bool {
        self.linked
    }

    /// Probe the backend for an existing device session and silently
    /// reconnect it when present.
    ///
    /// Never propagates a failure outward: every failure path lands on
    /// `Disconnected` and is returned as a diagnostic for the UI.
    pub async fn check_existing_connection(
        &mut self,
        backend: &impl BackendClient,
    ) -> Option<SessionError> {
        self.phase = ConnectionPhase::Checking;

        let status = match backend.check_connection().await {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, "connection check failed");
                self.phase = ConnectionPhase::Disconnected;
                return Some(err);
            }
        };

        if !status.connected {
            debug!("no existing device session found");
            self.phase = ConnectionPhase::Disconnected;
            return None;
        }

        match backend.reconnect_existing().await {
            Ok(()) => {
                debug!(device_id = ?status.device_id, "reconnected existing device");
                self.phase = ConnectionPhase::Connected;
                self.linked = true;
                self.clear_pairing_artifacts();
                None
            }
            Err(err) => {
                warn!(error = %err, "reconnect to existing device failed");
                self.phase = ConnectionPhase::Disconnected;
                Some(err)
            }
        }
    }

    /// Start a QR pairing attempt.
    ///
    /// The scannable payload arrives later as `BridgeEvent::QrIssued`;
    /// this call only opens the pairing session.
    pub async fn link_with_qr(&mut self, backend: &impl BackendClient) -> Result<(), SessionError> {
        self.phase = ConnectionPhase::Connecting;
        self.clear_pairing_artifacts();

        if let Err(err) = backend.start_qr_pairing().await {
            warn!(error = %err, "starting QR pairing failed");
            self.phase = ConnectionPhase::Disconnected;
            return Err(err);
        }

        debug!("QR pairing started; waiting for issued code");
        Ok(())
    }

    /// Request a phone pairing code and store it for display.
    ///
    /// A blank phone number is silently rejected with no state change.
    /// The submitted number is kept for redisplay regardless of outcome.
    pub async fn link_with_phone(
        &mut self,
        backend: &impl BackendClient,
        phone: &str,
    ) -> Result<(), SessionError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Ok(());
        }

        self.phase = ConnectionPhase::Connecting;
        self.clear_pairing_artifacts();
        self.phone_number = phone.to_owned();

        match backend.request_pairing_code(phone).await {
            Ok(code) => {
                debug!("pairing code issued");
                self.pairing_code = code;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "pairing code request failed");
                self.phase = ConnectionPhase::Disconnected;
                Err(err)
            }
        }
    }

    /// Local-only transition to disconnected.
    ///
    /// Does not notify the backend; a bridge-initiated disconnect is
    /// handled through the event path instead.
    pub fn disconnect(&mut self) {
        debug!("local disconnect requested");
        self.phase = ConnectionPhase::Disconnected;
        self.linked = false;
        self.clear_pairing_artifacts();
    }

    /// Apply one bridge event and report the follow-up the session owes.
    pub fn apply_event(&mut self, event: &BridgeEvent) -> Option<FollowUp> {
        match event {
            BridgeEvent::QrIssued { payload } => {
                if self.phase == ConnectionPhase::Connected {
                    debug!("ignoring issued QR code while connected");
                    return None;
                }
                self.phase = ConnectionPhase::Disconnected;
                self.qr_payload = payload.clone();
                None
            }
            BridgeEvent::SessionEstablished { info } => {
                debug!(%info, "session established");
                self.phase = ConnectionPhase::Connected;
                self.linked = true;
                self.clear_pairing_artifacts();
                Some(FollowUp::RefreshChats)
            }
            BridgeEvent::SessionLost { info } => {
                warn!(%info, "session lost");
                self.phase = ConnectionPhase::Disconnected;
                self.linked = false;
                self.clear_pairing_artifacts();
                Some(FollowUp::PurgeCache)
            }
            BridgeEvent::BackendError { info } => {
                warn!(%info, "bridge reported backend error");
                self.phase = ConnectionPhase::Disconnected;
                None
            }
        }
    }

    fn clear_pairing_artifacts(&mut self) {
        self.qr_payload.clear();
        self.pairing_code.clear();
    }
}
