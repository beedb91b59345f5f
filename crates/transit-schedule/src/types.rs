//! Schedule and output record types.

use serde::Serialize;
use std::sync::Arc;

/// One scheduled stop on a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopVisit {
    /// Arrival time in seconds since midnight of the service day.
    pub time: u32,
    /// Stop identifier, shared with every other visit of the same stop.
    pub stop_id: Arc<str>,
}

impl StopVisit {
    pub fn new(time: u32, stop_id: impl Into<Arc<str>>) -> Self {
        Self {
            time,
            stop_id: stop_id.into(),
        }
    }
}

/// A synthesized fare validation.
///
/// Field order is the serialization order: trip id, stop id, validation
/// time, then the optional validation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationEvent {
    pub trip_id: Arc<str>,
    pub stop_id: Arc<str>,
    /// `HH:MM:SS`, hours not wrapped at 24.
    pub validation_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_date: Option<Arc<str>>,
}

impl ValidationEvent {
    pub fn new(trip_id: Arc<str>, stop_id: Arc<str>, validation_time: String) -> Self {
        Self {
            trip_id,
            stop_id,
            validation_time,
            validation_date: None,
        }
    }

    /// Attach a service date to the event.
    pub fn with_date(mut self, date: Arc<str>) -> Self {
        self.validation_date = Some(date);
        self
    }
}
