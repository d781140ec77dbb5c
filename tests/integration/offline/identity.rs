use crate::common::{OTHER_SCOPE, TEACHER_SCOPE, scope, setup_offline_service, sync_config};
use edudash_offline::{
    AppError, CommitPolicy, EntityType, OfflineServiceTrait, PendingQueue, QueueKey, QueueKind,
    RecordFilter, RecordPayload,
};
use serde_json::json;

#[tokio::test]
async fn sign_out_then_other_identity_sees_nothing() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    ctx.service
        .save(
            EntityType::Assessment,
            RecordPayload::new(json!({"title": "Quiz 1"})).expect("payload"),
        )
        .await
        .expect("save");

    let removed = ctx.service.sign_out().await.expect("sign out");
    assert_eq!(removed, 1);

    ctx.service
        .sign_in(scope(OTHER_SCOPE))
        .await
        .expect("sign in");
    let records = ctx
        .service
        .list(EntityType::Assessment, RecordFilter::new())
        .await
        .expect("list");
    assert!(records.is_empty());

    let old_key = QueueKey::new(
        scope(TEACHER_SCOPE),
        EntityType::Assessment,
        QueueKind::OfflineMutations,
    );
    assert_eq!(ctx.queue.count(&old_key).await.expect("count"), 0);
}

#[tokio::test]
async fn switching_identity_without_sign_out_purges_previous() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    ctx.service
        .save(
            EntityType::Image,
            RecordPayload::new(json!({"caption": "Field trip"})).expect("payload"),
        )
        .await
        .expect("save");

    ctx.service
        .sign_in(scope(OTHER_SCOPE))
        .await
        .expect("switch identity");
    ctx.service
        .sign_in(scope(TEACHER_SCOPE))
        .await
        .expect("switch back");

    let records = ctx
        .service
        .list(EntityType::Image, RecordFilter::new())
        .await
        .expect("list");
    assert!(records.is_empty());
}

#[tokio::test]
async fn calls_after_sign_out_are_unauthorized() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.service.sign_out().await.expect("sign out");

    let result = ctx.service.sync().await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));

    let result = ctx
        .service
        .list(EntityType::Content, RecordFilter::new())
        .await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}
