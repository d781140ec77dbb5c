use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use edudash_offline::{
    EntityType, Record, RecordFilter, RecordId, RecordPayload, RemoteStore, RemoteStoreError,
};
use serde_json::Value;

/// In-memory remote store with an on/off connectivity switch.
pub struct FakeRemoteStore {
    online: AtomicBool,
    next_id: AtomicU64,
    records: Mutex<Vec<Record>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRemoteStore {
    pub fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn seed(&self, entity_type: EntityType, id: &str, payload: Value) {
        let record = Record::remote(
            RecordId::parse(id).expect("record id"),
            entity_type,
            RecordPayload::new(payload).expect("payload"),
            Utc::now(),
        );
        self.records.lock().unwrap().push(record);
    }

    pub fn stored(&self, entity_type: EntityType) -> Vec<Record> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.entity_type == entity_type)
            .cloned()
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check_online(&self, call: String) -> Result<(), RemoteStoreError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(RemoteStoreError::Unavailable("network unreachable".into()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl Default for FakeRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for FakeRemoteStore {
    async fn create(
        &self,
        entity_type: EntityType,
        payload: &RecordPayload,
    ) -> Result<Record, RemoteStoreError> {
        self.check_online(format!("create {entity_type}"))?;
        if payload.get("invalid") == Some(&Value::Bool(true)) {
            return Err(RemoteStoreError::ValidationFailed("invalid payload".into()));
        }

        let id = format!("R{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = Record::remote(
            RecordId::parse(&id).expect("record id"),
            entity_type,
            payload.clone(),
            Utc::now(),
        );
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        entity_type: EntityType,
        id: &RecordId,
        diff: &RecordPayload,
    ) -> Result<(), RemoteStoreError> {
        self.check_online(format!("update {id}"))?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record.entity_type == entity_type && &record.id == id)
            .ok_or_else(|| RemoteStoreError::NotFound(id.to_string()))?;

        let mut merged = record.payload.clone().into_inner();
        if let (Some(target), Some(changes)) = (merged.as_object_mut(), diff.as_json().as_object())
        {
            for (field, value) in changes {
                target.insert(field.clone(), value.clone());
            }
        }
        record.payload = RecordPayload::new(merged).expect("merged payload");
        Ok(())
    }

    async fn delete(&self, entity_type: EntityType, id: &RecordId) -> Result<(), RemoteStoreError> {
        self.check_online(format!("delete {id}"))?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| !(record.entity_type == entity_type && &record.id == id));
        if records.len() == before {
            return Err(RemoteStoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn query(
        &self,
        entity_type: EntityType,
        filter: &RecordFilter,
    ) -> Result<Vec<Record>, RemoteStoreError> {
        self.check_online(format!("query {entity_type}"))?;
        let limit = filter.limit.map(|limit| limit as usize).unwrap_or(usize::MAX);
        Ok(self
            .stored(entity_type)
            .into_iter()
            .filter(|record| filter.matches(&record.payload))
            .take(limit)
            .collect())
    }
}
