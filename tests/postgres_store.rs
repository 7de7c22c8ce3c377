//! `DbOperations` against a live Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`; each test gets a
//! fresh migrated database.

use sqlx::PgPool;
use std::sync::Arc;
use todo_api::db::{NewTask, NewUser, Role, TaskId, TaskPatch};
use todo_api::error::DatabaseError;
use todo_api::{DbOperations, TaskStore, UserStore};
use uuid::Uuid;

async fn store_with_owner(pool: PgPool) -> (DbOperations, Uuid) {
    let store = DbOperations::new(Arc::new(pool));
    let user = store
        .create_user(NewUser {
            name: "Pat".into(),
            email: "pat@example.com".into(),
            password_hash: "hash".into(),
            role: Role::Standard,
        })
        .await
        .unwrap();
    (store, user.id)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_update_keeps_or_clears_description(pool: PgPool) {
    let (store, owner) = store_with_owner(pool).await;
    let task = store
        .create(NewTask::new(owner, Some("write".into()), Some("draft".into()), None).unwrap())
        .await
        .unwrap();

    let patch = TaskPatch {
        completed: Some(true),
        ..TaskPatch::default()
    };
    let updated = store.update(task.task_id(), patch).await.unwrap();
    assert_eq!(updated.title, "write");
    assert_eq!(updated.description.as_deref(), Some("draft"));
    assert!(updated.completed);

    let patch = TaskPatch {
        title: Some("rewrite".into()),
        description: Some(Some("final".into())),
        ..TaskPatch::default()
    };
    let updated = store.update(task.task_id(), patch).await.unwrap();
    assert_eq!(updated.title, "rewrite");
    assert_eq!(updated.description.as_deref(), Some("final"));
    assert!(updated.completed);

    let patch = TaskPatch {
        description: Some(None),
        ..TaskPatch::default()
    };
    let updated = store.update(task.task_id(), patch).await.unwrap();
    assert_eq!(updated.title, "rewrite");
    assert!(updated.description.is_none());
    assert_eq!(updated.owner, owner);

    let stored = store.get(task.task_id()).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_toggle_flips_stored_value(pool: PgPool) {
    let (store, owner) = store_with_owner(pool).await;
    let task = store
        .create(NewTask::new(owner, Some("flip".into()), None, None).unwrap())
        .await
        .unwrap();

    assert!(store.toggle(task.task_id()).await.unwrap().completed);
    assert_eq!(store.list_by_status(owner, true).await.unwrap().len(), 1);
    assert!(!store.toggle(task.task_id()).await.unwrap().completed);
    assert_eq!(store.list_by_status(owner, false).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_unknown_ids_and_bulk_delete(pool: PgPool) {
    let (store, owner) = store_with_owner(pool).await;
    let missing = TaskId(Uuid::new_v4());

    assert!(matches!(store.toggle(missing).await, Err(DatabaseError::NotFound)));
    assert!(matches!(
        store.update(missing, TaskPatch::default()).await,
        Err(DatabaseError::NotFound)
    ));
    assert!(matches!(store.delete(missing).await, Err(DatabaseError::NotFound)));

    for (title, completed) in [("a", true), ("b", true), ("c", false)] {
        store
            .create(NewTask::new(owner, Some(title.into()), None, Some(completed)).unwrap())
            .await
            .unwrap();
    }

    assert_eq!(store.delete_all_by_status(owner, true).await.unwrap(), 2);
    let remaining = store.list(owner).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "c");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_duplicate_email_is_reported(pool: PgPool) {
    let (store, _) = store_with_owner(pool).await;
    let result = store
        .create_user(NewUser {
            name: "Other".into(),
            email: "pat@example.com".into(),
            password_hash: "hash".into(),
            role: Role::Standard,
        })
        .await;
    assert!(matches!(result, Err(DatabaseError::Duplicate)));
}
