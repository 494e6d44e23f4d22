use tokio::sync::broadcast;

use crate::event::CoreEvent;

/// Broadcast channel carrying [`CoreEvent`]s to every consumer of the core
/// (listing display, filter panel, breadcrumb header, SSE stream).
#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<CoreEvent>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. A send error only means there are currently no
    /// subscribers, which is not a failure for the core.
    pub fn publish(&self, event: CoreEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AddressPushedPayload;
    use crate::utils::time::now_rfc3339;
    use tokio::time::{timeout, Duration};

    fn test_event() -> CoreEvent {
        CoreEvent::AddressPushed(AddressPushedPayload {
            transition_id: "t-1".to_string(),
            path: "/category/coffee".to_string(),
            occurred_at: now_rfc3339(),
        })
    }

    #[tokio::test]
    async fn publish_and_receive_event() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(test_event());

        let received = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("recv");
        assert!(
            matches!(received, CoreEvent::AddressPushed(ref e) if e.path == "/category/coffee")
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_event() {
        let bus = Bus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(test_event());

        let event1 = rx1.recv().await.expect("recv1");
        let event2 = rx2.recv().await.expect("recv2");

        assert!(matches!(event1, CoreEvent::AddressPushed(ref e) if e.transition_id == "t-1"));
        assert!(matches!(event2, CoreEvent::AddressPushed(ref e) if e.transition_id == "t-1"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let bus = Bus::new(8);
        bus.publish(test_event());
    }
}
