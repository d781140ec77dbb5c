use async_trait::async_trait;
use mockall::mock;

use edudash_offline::{
    EntityType, Record, RecordFilter, RecordId, RecordPayload, RemoteStore, RemoteStoreError,
};

mock! {
    pub RemoteStorePort {}

    #[async_trait]
    impl RemoteStore for RemoteStorePort {
        async fn create(
            &self,
            entity_type: EntityType,
            payload: &RecordPayload,
        ) -> Result<Record, RemoteStoreError>;
        async fn update(
            &self,
            entity_type: EntityType,
            id: &RecordId,
            diff: &RecordPayload,
        ) -> Result<(), RemoteStoreError>;
        async fn delete(
            &self,
            entity_type: EntityType,
            id: &RecordId,
        ) -> Result<(), RemoteStoreError>;
        async fn query(
            &self,
            entity_type: EntityType,
            filter: &RecordFilter,
        ) -> Result<Vec<Record>, RemoteStoreError>;
    }
}

pub type MockRemoteStore = MockRemoteStorePort;
