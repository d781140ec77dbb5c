pub(super) const INSERT_QUEUE_ENTRY: &str = r#"
    INSERT INTO pending_queue_entries (
        entry_id,
        identity,
        entity_type,
        queue_kind,
        operation,
        entity_id,
        temp_id,
        payload,
        enqueued_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub(super) const SELECT_QUEUE_ENTRIES_BY_KEY: &str = r#"
    SELECT id, entry_id, identity, entity_type, queue_kind, operation,
           entity_id, temp_id, payload, enqueued_at
    FROM pending_queue_entries
    WHERE identity = ?1 AND entity_type = ?2 AND queue_kind = ?3
    ORDER BY enqueued_at ASC, id ASC
"#;

pub(super) const COUNT_QUEUE_ENTRIES_BY_KEY: &str = r#"
    SELECT COUNT(*) AS count
    FROM pending_queue_entries
    WHERE identity = ?1 AND entity_type = ?2 AND queue_kind = ?3
"#;

pub(super) const DELETE_QUEUE_ENTRIES_BY_KEY: &str = r#"
    DELETE FROM pending_queue_entries
    WHERE identity = ?1 AND entity_type = ?2 AND queue_kind = ?3
"#;

pub(super) const DELETE_QUEUE_ENTRY_BY_ID: &str = r#"
    DELETE FROM pending_queue_entries
    WHERE identity = ?1 AND entity_type = ?2 AND queue_kind = ?3 AND entry_id = ?4
"#;

pub(super) const DELETE_QUEUE_ENTRIES_BY_IDENTITY: &str = r#"
    DELETE FROM pending_queue_entries
    WHERE identity = ?1
"#;

pub(super) const SELECT_IDENTITIES: &str = r#"
    SELECT DISTINCT identity
    FROM pending_queue_entries
    ORDER BY identity ASC
"#;
