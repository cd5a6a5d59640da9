use tokio::sync::broadcast;

use crate::types::BridgeEvent;

/// Broadcast event stream consumed by session subscribers.
pub type EventStream = broadcast::Receiver<BridgeEvent>;

/// Fan-out channel carrying push events from the bridge to the session.
#[derive(Clone, Debug)]
pub struct BridgeChannels {
    event_tx: broadcast::Sender<BridgeEvent>,
}

impl BridgeChannels {
    /// Create a new event channel with the given buffer size.
    pub fn new(event_buffer: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_buffer.max(1));
        Self { event_tx }
    }

    /// Clone the event sender for a bridge-side producer.
    pub fn event_sender(&self) -> broadcast::Sender<BridgeEvent> {
        self.event_tx.clone()
    }

    /// Subscribe to emitted bridge events.
    pub fn subscribe(&self) -> EventStream {
        self.event_tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// Emission is best-effort; lagged subscribers are handled by `broadcast`.
    pub fn emit(&self, event: BridgeEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fans_out_events_to_subscribers() {
        let channels = BridgeChannels::new(16);
        let mut a = channels.subscribe();
        let mut b = channels.subscribe();

        channels.emit(BridgeEvent::QrIssued {
            payload: "CODE".to_owned(),
        });

        let event_a = a.recv().await.expect("subscriber a should receive event");
        let event_b = b.recv().await.expect("subscriber b should receive event");
        assert_eq!(event_a, event_b);
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_best_effort() {
        let channels = BridgeChannels::new(4);
        channels.emit(BridgeEvent::SessionLost {
            info: "nobody listening".to_owned(),
        });

        let mut late = channels.subscribe();
        channels.emit(BridgeEvent::BackendError {
            info: "after subscribe".to_owned(),
        });
        let event = late.recv().await.expect("late subscriber should receive");
        assert_eq!(
            event,
            BridgeEvent::BackendError {
                info: "after subscribe".to_owned()
            }
        );
    }
}
