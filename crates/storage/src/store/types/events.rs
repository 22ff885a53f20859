#![forbid(unsafe_code)]

use serde::Serialize;

/// Journal entry written in the same transaction as the mutation it describes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleEvent {
    pub seq: i64,
    pub schedule_id: String,
    pub ts_ms: i64,
    pub task_id: Option<String>,
    pub event_type: String,
    pub payload_json: String,
}

impl ScheduleEvent {
    pub fn event_id(&self) -> String {
        format!("evt_{:016}", self.seq)
    }

    pub fn payload(&self) -> serde_json::Value {
        serde_json::from_str(&self.payload_json).unwrap_or(serde_json::Value::Null)
    }
}
