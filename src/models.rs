use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// name/type/icon are copied at save time and returned as saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub done: u8,
    pub val: i64,
    pub icon: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub days: BTreeMap<String, Vec<SnapshotRow>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitPayload {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub val: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl HabitPayload {
    pub fn into_row(self, date: &str) -> SnapshotRow {
        SnapshotRow {
            id: self.id,
            name: self.name,
            kind: self.kind,
            done: u8::from(self.done.unwrap_or(false)),
            val: self.val.unwrap_or(0),
            icon: self.icon.unwrap_or_default(),
            date: date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub habits: Vec<HabitPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub date: String,
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
