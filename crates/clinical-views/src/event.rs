use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use cqrs_es::{Aggregate, DomainEvent as _, EventEnvelope, Query};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Serialized form of a committed event, as handed to logs and transcripts.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, new)]
pub struct DomainEvent {
    pub id: String,
    pub aggregate_type: String,
    pub sequence: usize,
    pub event_type: String,
    pub event_version: String,
    pub payload: String,
    pub metadata: String,
}

impl DomainEvent {
    pub fn from_envelope<A: Aggregate>(
        envelope: &EventEnvelope<A>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            envelope.aggregate_id.clone(),
            A::aggregate_type(),
            envelope.sequence,
            envelope.payload.event_type(),
            envelope.payload.event_version(),
            serde_json::to_string(&envelope.payload)?,
            serde_json::to_string(&envelope.metadata)?,
        ))
    }
}

/// Query that logs every committed event and keeps an in-order transcript.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<DomainEvent>>>,
}

impl EventLog {
    pub fn entries(&self) -> Vec<DomainEvent> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl<A: Aggregate> Query<A> for EventLog {
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<A>]) {
        for envelope in events {
            match DomainEvent::from_envelope(envelope) {
                Ok(event) => {
                    tracing::info!(
                        "{} #{} for {}",
                        event.event_type,
                        event.sequence,
                        aggregate_id
                    );
                    self.entries
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(event);
                }
                Err(err) => {
                    tracing::error!("Failed to serialize event for {}: {}", aggregate_id, err);
                }
            }
        }
    }
}
