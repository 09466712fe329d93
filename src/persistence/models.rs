//! Rows written to the event log.

use crate::domain::PoolEvent;

/// An event ready to be appended to the log.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Pool that generated the event.
    pub pool_id: String,
    /// Event type discriminator.
    pub event_type: &'static str,
    /// Serialized event.
    pub payload: serde_json::Value,
}

impl TryFrom<&PoolEvent> for NewEvent {
    type Error = serde_json::Error;

    fn try_from(event: &PoolEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            pool_id: event.pool_id().to_string(),
            event_type: event.event_type_str(),
            payload: serde_json::to_value(event)?,
        })
    }
}
