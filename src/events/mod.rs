//! In-process domain events.
//!
//! Services publish onto an mpsc channel after their database work commits;
//! a background task consumes and logs them. Nothing in request handling
//! waits on a consumer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Events emitted by the domain services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ConsumableAdded {
        consumable_id: Uuid,
        location: String,
        quantity: i32,
    },
    ConsumableAllocated {
        source_id: Uuid,
        destination_id: Option<Uuid>,
        destination_location: String,
        quantity: i32,
        user: String,
    },
    SerialUnitRelocated {
        serial_stock_id: Uuid,
        location: String,
        status: String,
    },
    DeliveryNoteCreated {
        delivery_note_id: Uuid,
        del_note_number: String,
        item_count: usize,
    },
    PrvDeviceCreated {
        prv_device_id: Uuid,
        site_id: Uuid,
    },
    PrvServiceScheduled {
        prv_service_id: Uuid,
        prv_device_id: Uuid,
    },
    PrvServiceUpdated(Uuid),
    ServiceDocumentAttached {
        prv_service_id: Uuid,
        document_id: Uuid,
    },
}

/// Drains the event channel, logging each event. Runs until every sender
/// is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ConsumableAllocated {
                source_id,
                destination_location,
                quantity,
                user,
                ..
            } => {
                info!(
                    source_id = %source_id,
                    destination = %destination_location,
                    quantity,
                    user = %user,
                    "consumable allocated"
                );
            }
            Event::DeliveryNoteCreated {
                del_note_number,
                item_count,
                ..
            } => {
                info!(number = %del_note_number, items = item_count, "delivery note created");
            }
            other => info!(event = ?other, "domain event"),
        }
    }
    info!("event channel closed; processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_to_processor() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::PrvDeviceCreated {
                prv_device_id: Uuid::new_v4(),
                site_id: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::PrvDeviceCreated { .. })
        ));
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender
            .send(Event::PrvServiceUpdated(Uuid::new_v4()))
            .await
            .is_err());
    }
}
