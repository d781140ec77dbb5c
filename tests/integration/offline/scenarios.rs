use crate::common::{setup_offline_service, sync_config};
use edudash_offline::{
    CommitPolicy, EntityType, OfflineServiceTrait, QueueKind, RecordFilter, RecordId,
    RecordPayload,
};
use serde_json::json;
use std::collections::HashSet;

fn payload(value: serde_json::Value) -> RecordPayload {
    RecordPayload::new(value).expect("payload")
}

#[tokio::test]
async fn offline_save_is_listed_with_temporary_id() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    let id = ctx
        .service
        .save(EntityType::Student, payload(json!({"name": "Asha", "grade": "3"})))
        .await
        .expect("save");
    assert!(id.is_temporary());

    let records = ctx
        .service
        .list(EntityType::Student, RecordFilter::new())
        .await
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].to_flat_json(),
        json!({"id": id.as_str(), "name": "Asha", "grade": "3"})
    );
    assert!(records[0].is_queued());
}

#[tokio::test]
async fn online_save_leaves_no_queue_residue() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;

    let id = ctx
        .service
        .save(EntityType::Content, payload(json!({"title": "Story A"})))
        .await
        .expect("save");
    assert_eq!(id.as_str(), "R1");

    let records = ctx
        .service
        .list(EntityType::Content, RecordFilter::new())
        .await
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_str(), "R1");
    assert!(!records[0].is_queued());
    assert!(ctx.service.pending_counts().await.expect("counts").is_empty());
}

#[tokio::test]
async fn offline_update_replays_after_reconnect() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote
        .seed(EntityType::Student, "S1", json!({"name": "Asha", "grade": "3"}));
    ctx.remote.set_online(false);

    ctx.service
        .update(
            EntityType::Student,
            RecordId::parse("S1").expect("id"),
            payload(json!({"grade": "4"})),
        )
        .await
        .expect("update is absorbed while offline");

    let counts = ctx.service.pending_counts().await.expect("counts");
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].queue_kind, QueueKind::PendingUpdates);

    ctx.remote.set_online(true);
    let report = ctx.service.sync().await.expect("sync");

    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert!(report.is_clean());
    assert!(ctx.service.pending_counts().await.expect("counts").is_empty());

    let stored = ctx.remote.stored(EntityType::Student);
    assert_eq!(stored[0].payload.get("grade"), Some(&json!("4")));
}

#[tokio::test]
async fn edit_to_offline_record_after_reconnect_is_queued() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    let temp_id = ctx
        .service
        .save(EntityType::Student, payload(json!({"name": "Asha", "grade": "3"})))
        .await
        .expect("save");

    ctx.remote.set_online(true);
    ctx.service
        .update(EntityType::Student, temp_id, payload(json!({"grade": "4"})))
        .await
        .expect("edit to an unsynced record is accepted online");
    assert!(ctx.remote.calls().is_empty());

    let report = ctx.service.sync().await.expect("sync");
    assert_eq!(report.attempted, 2);
    assert!(report.is_clean());
    assert_eq!(
        ctx.remote.calls(),
        vec!["create student".to_string(), "update R1".to_string()]
    );

    let stored = ctx.remote.stored(EntityType::Student);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].payload.get("grade"), Some(&json!("4")));
    assert!(ctx.service.pending_counts().await.expect("counts").is_empty());
}

#[tokio::test]
async fn failed_delete_replay_is_still_cleared() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    ctx.service
        .delete(EntityType::Content, RecordId::parse("missing-id").expect("id"))
        .await
        .expect("delete is absorbed while offline");

    ctx.remote.set_online(true);
    let report = ctx.service.sync().await.expect("sync");

    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.retained, 0);
    assert_eq!(ctx.remote.calls(), vec!["delete missing-id".to_string()]);
    assert!(ctx.service.pending_counts().await.expect("counts").is_empty());
}

#[tokio::test]
async fn offline_saves_are_listed_once_in_enqueue_order() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    let mut saved = Vec::new();
    for index in 0..5 {
        let id = ctx
            .service
            .save(
                EntityType::Mark,
                payload(json!({"student": format!("S{index}"), "score": index})),
            )
            .await
            .expect("save");
        saved.push(id);
    }

    let listed: Vec<RecordId> = ctx
        .service
        .list(EntityType::Mark, RecordFilter::new())
        .await
        .expect("list")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(listed, saved);

    let distinct: HashSet<&RecordId> = saved.iter().collect();
    assert_eq!(distinct.len(), saved.len());
}

#[tokio::test]
async fn clean_sync_leaves_only_remote_records() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);
    for title in ["Story A", "Story B"] {
        ctx.service
            .save(EntityType::Content, payload(json!({"title": title})))
            .await
            .expect("save");
    }

    ctx.remote.set_online(true);
    let report = ctx.service.sync().await.expect("sync");
    assert_eq!(report.succeeded, 2);

    let records = ctx
        .service
        .list(EntityType::Content, RecordFilter::new())
        .await
        .expect("list");
    let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2"]);
    assert!(records.iter().all(|record| !record.is_queued()));
}

#[tokio::test]
async fn update_to_offline_created_record_follows_remote_id() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    let temp_id = ctx
        .service
        .save(EntityType::LessonPlan, payload(json!({"topic": "Fractions"})))
        .await
        .expect("save");
    ctx.service
        .update(
            EntityType::LessonPlan,
            temp_id,
            payload(json!({"topic": "Decimals"})),
        )
        .await
        .expect("update");

    ctx.remote.set_online(true);
    let report = ctx.service.sync().await.expect("sync");

    assert!(report.is_clean());
    assert_eq!(
        ctx.remote.calls(),
        vec!["create lesson_plan".to_string(), "update R1".to_string()]
    );
    let stored = ctx.remote.stored(EntityType::LessonPlan);
    assert_eq!(stored[0].payload.get("topic"), Some(&json!("Decimals")));
}

#[tokio::test]
async fn filtered_list_while_offline_applies_to_queued_records() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    for (name, grade) in [("Asha", "3"), ("Ravi", "4"), ("Mei", "4")] {
        ctx.service
            .save(EntityType::Student, payload(json!({"name": name, "grade": grade})))
            .await
            .expect("save");
    }

    let records = ctx
        .service
        .list(
            EntityType::Student,
            RecordFilter::new().with_field("grade", "4"),
        )
        .await
        .expect("list");
    let names: Vec<_> = records
        .iter()
        .filter_map(|record| record.payload.get("name").cloned())
        .collect();
    assert_eq!(names, vec![json!("Ravi"), json!("Mei")]);
}
