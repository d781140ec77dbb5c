use crate::application::ports::remote_store::{RemoteStore, RemoteStoreError};
use crate::domain::entities::offline::{Record, RecordFilter};
use crate::domain::value_objects::offline::{EntityType, RecordId, RecordPayload};
use crate::shared::config::RemoteConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// JSON-over-HTTP backend. One collection per entity type.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpRemoteStore {
    pub fn from_config(config: &RemoteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn collection_url(&self, entity_type: EntityType) -> String {
        format!("{}/{}", self.base_url, entity_type.collection())
    }

    fn record_url(&self, entity_type: EntityType, id: &RecordId) -> String {
        format!("{}/{}", self.collection_url(entity_type), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteStoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| RemoteStoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }
}

/// Maps a non-success HTTP status to the error taxonomy the queue understands.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> RemoteStoreError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", body.trim())
    };

    if status == StatusCode::NOT_FOUND {
        RemoteStoreError::NotFound(detail)
    } else if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        RemoteStoreError::Unavailable(detail)
    } else {
        RemoteStoreError::ValidationFailed(detail)
    }
}

/// Splits a remote JSON object into id, creation time and the remaining fields.
pub(crate) fn record_from_json(
    entity_type: EntityType,
    value: Value,
) -> Result<Record, RemoteStoreError> {
    let Value::Object(mut fields) = value else {
        return Err(RemoteStoreError::Unavailable(
            "remote returned a non-object record".to_string(),
        ));
    };

    let id = match fields.remove("id") {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(RemoteStoreError::Unavailable(
                "remote record without id".to_string(),
            ));
        }
    };
    let id = RecordId::new(id).map_err(RemoteStoreError::Unavailable)?;

    let created_at = fields
        .remove("createdAt")
        .and_then(|value| value.as_str().map(str::to_string))
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let payload =
        RecordPayload::new(Value::Object(fields)).map_err(RemoteStoreError::Unavailable)?;
    Ok(Record::remote(id, entity_type, payload, created_at))
}

fn records_from_json(
    entity_type: EntityType,
    value: Value,
) -> Result<Vec<Record>, RemoteStoreError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RemoteStoreError::Unavailable(
                    "remote query response without data array".to_string(),
                ));
            }
        },
        _ => {
            return Err(RemoteStoreError::Unavailable(
                "unexpected remote query response".to_string(),
            ));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match record_from_json(entity_type, item) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                target: "offline::read",
                entity_type = %entity_type,
                error = %err,
                "skipping malformed remote record"
            ),
        }
    }
    Ok(records)
}

async fn json_body(response: Response) -> Result<Value, RemoteStoreError> {
    response
        .json::<Value>()
        .await
        .map_err(|e| RemoteStoreError::Unavailable(format!("invalid response body: {e}")))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create(
        &self,
        entity_type: EntityType,
        payload: &RecordPayload,
    ) -> Result<Record, RemoteStoreError> {
        let request = self
            .client
            .post(self.collection_url(entity_type))
            .json(payload.as_json());
        let response = self.send(request).await?;
        let record = record_from_json(entity_type, json_body(response).await?)?;
        debug!(entity_type = %entity_type, record_id = %record.id, "remote create");
        Ok(record)
    }

    async fn update(
        &self,
        entity_type: EntityType,
        id: &RecordId,
        diff: &RecordPayload,
    ) -> Result<(), RemoteStoreError> {
        let request = self
            .client
            .patch(self.record_url(entity_type, id))
            .json(diff.as_json());
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, entity_type: EntityType, id: &RecordId) -> Result<(), RemoteStoreError> {
        let request = self.client.delete(self.record_url(entity_type, id));
        self.send(request).await?;
        Ok(())
    }

    async fn query(
        &self,
        entity_type: EntityType,
        filter: &RecordFilter,
    ) -> Result<Vec<Record>, RemoteStoreError> {
        let request = self
            .client
            .get(self.collection_url(entity_type))
            .query(&filter.query_pairs());
        let response = self.send(request).await?;
        records_from_json(entity_type, json_body(response).await?)
    }
}
