// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{CreateUser, User};
use crate::domain::repositories::cache_store::{CacheError, CacheStore};
use crate::domain::repositories::user_repository::{RepositoryError, UserRepository};
use crate::domain::services::event_publisher::EventPublisher;
use crate::domain::services::metrics_sink::{FieldValue, MetricPoint, MetricsSink};
use crate::domain::services::service_registry::{ServiceRecord, ServiceRegistry};
use crate::domain::services::user_service::{UserService, ALL_USERS_CACHE_KEY};
use anyhow::Result;
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::*;
use mockall::Sequence;
use serde_json::Value;
use std::sync::Arc;

// --- Mocks ---

mock! {
    pub UserRepository {}
    #[async_trait]
    impl UserRepository for UserRepository {
        async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
        async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError>;
        async fn insert(&self, draft: CreateUser) -> Result<User, RepositoryError>;
    }
}

mock! {
    pub CacheStore {}
    #[async_trait]
    impl CacheStore for CacheStore {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
        async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;
        async fn delete(&self, key: &str) -> Result<u64, CacheError>;
    }
}

mock! {
    pub MetricsSink {}
    #[async_trait]
    impl MetricsSink for MetricsSink {
        async fn write_point(&self, point: MetricPoint) -> Result<()>;
    }
}

mock! {
    pub EventPublisher {}
    #[async_trait]
    impl EventPublisher for EventPublisher {
        async fn emit(&self, topic: &str, payload: Value) -> Result<()>;
    }
}

mock! {
    pub ServiceRegistry {}
    #[async_trait]
    impl ServiceRegistry for ServiceRegistry {
        async fn register(&self, record: &ServiceRecord) -> Result<()>;
    }
}

// --- Helpers ---

fn alice() -> User {
    User {
        id: 7,
        username: "alice".to_string(),
        password: "secret1".to_string(),
        email: Some("alice@example.com".to_string()),
        is_active: Some(true),
    }
}

fn bob_draft() -> CreateUser {
    CreateUser {
        username: "bob".to_string(),
        password: "secret1".to_string(),
        email: None,
        is_active: None,
    }
}

fn service(
    repo: MockUserRepository,
    cache: MockCacheStore,
    metrics: MockMetricsSink,
    events: MockEventPublisher,
    registry: MockServiceRegistry,
) -> UserService {
    UserService::new(
        Arc::new(repo),
        Arc::new(cache),
        Arc::new(metrics),
        Arc::new(events),
        Arc::new(registry),
        "localhost".to_string(),
        3000,
    )
}

// --- Read path ---

#[tokio::test]
async fn test_find_one_served_from_cache_without_touching_store() {
    let repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();
    let cached = serde_json::to_string(&alice()).unwrap();
    cache
        .expect_get()
        .withf(|key| key == "user:7")
        .times(1)
        .returning(move |_| Ok(Some(cached.clone())));

    let svc = service(
        repo,
        cache,
        MockMetricsSink::new(),
        MockEventPublisher::new(),
        MockServiceRegistry::new(),
    );

    let found = svc.find_one(7).await.unwrap();
    assert_eq!(found, Some(alice()));
}

#[tokio::test]
async fn test_find_one_cache_miss_populates_cache_with_fixed_ttl() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();

    cache
        .expect_get()
        .withf(|key| key == "user:7")
        .times(1)
        .returning(|_| Ok(None));
    repo.expect_find_by_id()
        .with(eq(7))
        .times(1)
        .returning(|_| Ok(Some(alice())));
    cache
        .expect_set_ex()
        .withf(|key, value, ttl| key == "user:7" && value.contains("alice") && *ttl == 3600)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let svc = service(
        repo,
        cache,
        MockMetricsSink::new(),
        MockEventPublisher::new(),
        MockServiceRegistry::new(),
    );

    let found = svc.find_one(7).await.unwrap();
    assert_eq!(found, Some(alice()));
}

#[tokio::test]
async fn test_find_one_missing_user_is_not_an_error() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();

    cache.expect_get().times(1).returning(|_| Ok(None));
    repo.expect_find_by_id()
        .with(eq(999))
        .times(1)
        .returning(|_| Ok(None));
    // The absence is not cached
    cache.expect_set_ex().times(0);

    let svc = service(
        repo,
        cache,
        MockMetricsSink::new(),
        MockEventPublisher::new(),
        MockServiceRegistry::new(),
    );

    assert_eq!(svc.find_one(999).await.unwrap(), None);
}

#[tokio::test]
async fn test_find_one_cache_failure_is_treated_as_miss() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();

    cache
        .expect_get()
        .times(1)
        .returning(|_| Err(CacheError::Backend("connection refused".to_string())));
    repo.expect_find_by_id()
        .times(1)
        .returning(|_| Ok(Some(alice())));
    cache.expect_set_ex().times(1).returning(|_, _, _| Ok(()));

    let svc = service(
        repo,
        cache,
        MockMetricsSink::new(),
        MockEventPublisher::new(),
        MockServiceRegistry::new(),
    );

    assert_eq!(svc.find_one(7).await.unwrap(), Some(alice()));
}

#[tokio::test]
async fn test_find_all_emits_metric_and_event_after_database_read() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();
    let mut metrics = MockMetricsSink::new();
    let mut events = MockEventPublisher::new();

    cache
        .expect_get()
        .withf(|key| key == ALL_USERS_CACHE_KEY)
        .times(1)
        .returning(|_| Ok(None));
    repo.expect_find_all()
        .times(1)
        .returning(|| Ok(vec![alice()]));
    cache
        .expect_set_ex()
        .withf(|key, _, ttl| key == ALL_USERS_CACHE_KEY && *ttl == 3600)
        .times(1)
        .returning(|_, _, _| Ok(()));
    metrics
        .expect_write_point()
        .withf(|point| {
            point.measurement == "user_query"
                && point
                    .tags
                    .contains(&("operation".to_string(), "findAll".to_string()))
                && point
                    .fields
                    .contains(&("count".to_string(), FieldValue::Integer(1)))
        })
        .times(1)
        .returning(|_| Ok(()));
    events
        .expect_emit()
        .withf(|topic, payload| topic == "user_query" && payload["count"] == 1)
        .times(1)
        .returning(|_, _| Ok(()));

    let svc = service(repo, cache, metrics, events, MockServiceRegistry::new());

    let users = svc.find_all().await.unwrap();
    assert_eq!(users, vec![alice()]);
}

#[tokio::test]
async fn test_find_all_is_idempotent_second_call_served_from_cache() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();
    let mut metrics = MockMetricsSink::new();
    let mut events = MockEventPublisher::new();
    let mut seq = Sequence::new();

    let snapshot = serde_json::to_string(&vec![alice()]).unwrap();

    // First call: miss, database read, write-back.
    cache
        .expect_get()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(None));
    repo.expect_find_all()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![alice()]));
    cache
        .expect_set_ex()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    metrics.expect_write_point().times(1).returning(|_| Ok(()));
    events.expect_emit().times(1).returning(|_, _| Ok(()));

    // Second call: hit, no database read, no metric, no event.
    cache
        .expect_get()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(snapshot.clone())));

    let svc = service(repo, cache, metrics, events, MockServiceRegistry::new());

    let first = svc.find_all().await.unwrap();
    let second = svc.find_all().await.unwrap();
    assert_eq!(first, second);
}

// --- Write path ---

#[tokio::test]
async fn test_create_invalidates_list_cache_after_insert() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();
    let mut metrics = MockMetricsSink::new();
    let mut events = MockEventPublisher::new();
    let mut registry = MockServiceRegistry::new();
    let mut seq = Sequence::new();

    repo.expect_insert()
        .with(eq(bob_draft()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|draft| {
            Ok(User {
                id: 42,
                username: draft.username,
                password: draft.password,
                email: draft.email,
                is_active: draft.is_active,
            })
        });
    cache
        .expect_delete()
        .withf(|key| key == ALL_USERS_CACHE_KEY)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(1));
    metrics
        .expect_write_point()
        .withf(|point| {
            point.measurement == "user_operation"
                && point
                    .tags
                    .contains(&("operation".to_string(), "create".to_string()))
                && point
                    .tags
                    .contains(&("username".to_string(), "bob".to_string()))
                && point
                    .fields
                    .contains(&("id".to_string(), FieldValue::Integer(42)))
        })
        .times(1)
        .returning(|_| Ok(()));
    events
        .expect_emit()
        .withf(|topic, payload| {
            topic == "user_created" && payload["id"] == 42 && payload["username"] == "bob"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    registry.expect_register().times(1).returning(|_| Ok(()));

    let svc = service(repo, cache, metrics, events, registry);

    let user = svc.create(bob_draft()).await.unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.username, "bob");
}

#[tokio::test]
async fn test_create_returns_user_when_every_side_effect_fails() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();
    let mut metrics = MockMetricsSink::new();
    let mut events = MockEventPublisher::new();
    let mut registry = MockServiceRegistry::new();

    repo.expect_insert().times(1).returning(|draft| {
        Ok(User {
            id: 42,
            username: draft.username,
            password: draft.password,
            email: draft.email,
            is_active: draft.is_active,
        })
    });
    cache
        .expect_delete()
        .times(1)
        .returning(|_| Err(CacheError::Backend("redis down".to_string())));
    metrics
        .expect_write_point()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("influx down")));
    events
        .expect_emit()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("broker down")));
    registry
        .expect_register()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("consul down")));

    let svc = service(repo, cache, metrics, events, registry);

    let user = svc.create(bob_draft()).await.unwrap();
    assert_eq!(user.id, 42);
}

#[tokio::test]
async fn test_create_registers_record_named_after_new_user() {
    let mut repo = MockUserRepository::new();
    let mut cache = MockCacheStore::new();
    let mut metrics = MockMetricsSink::new();
    let mut events = MockEventPublisher::new();
    let mut registry = MockServiceRegistry::new();

    repo.expect_insert().times(1).returning(|draft| {
        Ok(User {
            id: 42,
            username: draft.username,
            password: draft.password,
            email: draft.email,
            is_active: draft.is_active,
        })
    });
    cache.expect_delete().times(1).returning(|_| Ok(1));
    metrics.expect_write_point().times(1).returning(|_| Ok(()));
    events.expect_emit().times(1).returning(|_, _| Ok(()));
    registry
        .expect_register()
        .withf(|record| {
            record.name == "user-42"
                && record.id == "user-42"
                && record.tags == vec!["user".to_string(), "api".to_string()]
                && record.address.as_deref() == Some("localhost")
                && record.port == Some(3000)
        })
        .times(1)
        .returning(|_| Ok(()));

    let svc = service(repo, cache, metrics, events, registry);

    svc.create(bob_draft()).await.unwrap();
}

#[tokio::test]
async fn test_create_fails_when_insert_fails() {
    let mut repo = MockUserRepository::new();

    repo.expect_insert()
        .times(1)
        .returning(|_| Err(RepositoryError::Database("duplicate entry".to_string())));

    // No fan-out step may run when the insert fails.
    let svc = service(
        repo,
        MockCacheStore::new(),
        MockMetricsSink::new(),
        MockEventPublisher::new(),
        MockServiceRegistry::new(),
    );

    assert!(svc.create(bob_draft()).await.is_err());
}
