use crate::domain::value_objects::offline::RecordPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field-equality filter forwarded to the remote store and applied to queued records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordFilter {
    pub equals: BTreeMap<String, Value>,
    pub limit: Option<u32>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.insert(field.into(), value.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.limit.is_none()
    }

    pub fn matches(&self, payload: &RecordPayload) -> bool {
        self.equals
            .iter()
            .all(|(field, expected)| payload.get(field) == Some(expected))
    }

    /// Query string pairs; non-string values are sent as their JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .equals
            .iter()
            .map(|(field, value)| {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (field.clone(), rendered)
            })
            .collect();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}
