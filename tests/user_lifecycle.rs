//! User Lifecycle Tests
//!
//! Coordinator-level behaviour of the SCIM User lifecycle:
//! - userName uniqueness on create
//! - validation ordering
//! - partial-update merge semantics
//! - timestamp monotonicity
//! - hard delete and name reuse

use std::sync::Arc;
use std::thread;

use scim_import::scim::mapper::{merge_update, to_canonical, to_wire};
use scim_import::scim::{
    EmailPayload, InMemoryUserStore, LifecycleError, NamePayload, UpdateMode, UserLifecycle,
    UserPayload, ValidationError, CORE_USER_SCHEMA,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn lifecycle() -> UserLifecycle<InMemoryUserStore> {
    UserLifecycle::new(Arc::new(InMemoryUserStore::new()))
}

fn payload(value: serde_json::Value) -> UserPayload {
    serde_json::from_value(value).unwrap()
}

fn user(user_name: &str) -> UserPayload {
    payload(json!({
        "schemas": [CORE_USER_SCHEMA],
        "userName": user_name
    }))
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario A: minimal create yields a generated id and active=true.
#[test]
fn test_create_minimal_user() {
    let users = lifecycle();
    let created = users.create(Some(&user("alice"))).unwrap();

    let wire = to_wire(&created);
    assert_eq!(wire.user_name, "alice");
    assert!(wire.active);
    assert!(!wire.id.is_nil());
}

/// Scenario B: second create with the same userName conflicts.
#[test]
fn test_duplicate_user_name_conflicts() {
    let users = lifecycle();
    users.create(Some(&user("alice"))).unwrap();

    let second = users.create(Some(&user("alice")));
    assert_eq!(second, Err(LifecycleError::Conflict("alice".to_string())));
}

/// Scenario C: userName with space and '!' fails the format rule.
#[test]
fn test_bad_user_name_format() {
    let result = lifecycle().create(Some(&user("bad user!")));
    assert_eq!(
        result,
        Err(LifecycleError::Validation(ValidationError::UserNameFormat))
    );
}

/// Scenario D: update of an unknown id.
#[test]
fn test_update_unknown_id() {
    let result = lifecycle().update("ghost", Some(&user("ghost")), UpdateMode::Validated);
    assert_eq!(result, Err(LifecycleError::NotFound("ghost".to_string())));
}

/// Scenario E: delete then get.
#[test]
fn test_delete_then_get() {
    let users = lifecycle();
    let id = users.create(Some(&user("alice"))).unwrap().id.to_string();

    assert_eq!(users.delete(&id), Ok(()));
    assert_eq!(users.get(&id), Err(LifecycleError::NotFound(id.clone())));
}

/// Scenario F: malformed email address.
#[test]
fn test_bad_email_format() {
    let result = lifecycle().create(Some(&payload(json!({
        "schemas": [CORE_USER_SCHEMA],
        "userName": "alice",
        "emails": [{"value": "not-an-email"}]
    }))));

    match result {
        Err(LifecycleError::Validation(err)) => {
            assert_eq!(err, ValidationError::EmailFormat("not-an-email".to_string()));
            assert!(err.to_string().starts_with("email format"));
        }
        other => panic!("expected email format failure, got {:?}", other),
    }
}

// =============================================================================
// Validation Ordering
// =============================================================================

/// Missing userName is reported before missing schemas.
#[test]
fn test_user_name_error_reported_first() {
    let result = lifecycle().create(Some(&payload(json!({"active": true}))));
    assert_eq!(
        result,
        Err(LifecycleError::Validation(ValidationError::UserNameRequired))
    );
}

/// Missing schemas alone is reported as such.
#[test]
fn test_schemas_required() {
    let result = lifecycle().create(Some(&payload(json!({"userName": "alice"}))));
    assert_eq!(
        result,
        Err(LifecycleError::Validation(ValidationError::SchemasRequired))
    );
}

/// Validation failure leaves the store untouched.
#[test]
fn test_rejected_create_has_no_side_effects() {
    let users = lifecycle();
    let _ = users.create(Some(&user("bad user!")));
    assert!(users.list().unwrap().is_empty());
}

// =============================================================================
// Uniqueness
// =============================================================================

/// Deleting a record frees its userName.
#[test]
fn test_user_name_reusable_after_delete() {
    let users = lifecycle();
    let first = users.create(Some(&user("alice"))).unwrap();
    users.delete(&first.id.to_string()).unwrap();

    let second = users.create(Some(&user("alice"))).unwrap();
    assert_ne!(first.id, second.id);
}

/// Concurrent creates with one userName admit exactly one record.
#[test]
fn test_concurrent_creates_admit_one() {
    let users = Arc::new(lifecycle());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let users = Arc::clone(&users);
            thread::spawn(move || users.create(Some(&user("racer"))))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(LifecycleError::Conflict(_))))
        .count();

    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(users.list().unwrap().len(), 1);
}

/// Update may rename onto another record's userName; not re-checked.
#[test]
fn test_update_does_not_recheck_uniqueness() {
    let users = lifecycle();
    users.create(Some(&user("alice"))).unwrap();
    let bob = users.create(Some(&user("bob"))).unwrap();

    let renamed = users
        .update(&bob.id.to_string(), Some(&user("alice")), UpdateMode::Validated)
        .unwrap();
    assert_eq!(renamed.user_name, "alice");
}

// =============================================================================
// Mapping And Merge
// =============================================================================

/// Wire projection keeps userName, emails and active as supplied.
#[test]
fn test_round_trip_preserves_fields() {
    let input = payload(json!({
        "schemas": [CORE_USER_SCHEMA],
        "userName": "carol",
        "emails": [
            {"value": "carol@example.com", "type": "work", "primary": true},
            {"value": "carol@home.example"}
        ],
        "active": false
    }));

    let wire = to_wire(&to_canonical(&input));
    let value = serde_json::to_value(&wire).unwrap();

    assert_eq!(value["userName"], "carol");
    assert_eq!(
        value["emails"],
        json!([
            {"value": "carol@example.com", "type": "work", "primary": true},
            {"value": "carol@home.example"}
        ])
    );
    assert_eq!(value["active"], false);
}

/// An empty update changes nothing but updated_at.
#[test]
fn test_empty_update_is_identity() {
    let record = to_canonical(&payload(json!({
        "userName": "dave",
        "externalId": "x-1",
        "name": {"familyName": "Jones", "givenName": "Dave"},
        "emails": [{"value": "dave@example.com"}]
    })));

    let merged = merge_update(&record, &UserPayload::default());
    let mut expected = record.clone();
    expected.updated_at = merged.updated_at;

    assert_eq!(merged, expected);
    assert!(merged.updated_at > record.updated_at);
}

/// Partial update keeps untouched fields, including name parts.
#[test]
fn test_partial_update_keeps_untouched_fields() {
    let users = lifecycle();
    let created = users
        .create(Some(&UserPayload {
            name: Some(NamePayload {
                family_name: Some("Smith".to_string()),
                given_name: Some("Erin".to_string()),
            }),
            emails: Some(vec![EmailPayload {
                value: Some("erin@example.com".to_string()),
                ..Default::default()
            }]),
            external_id: Some("ext-9".to_string()),
            ..user("erin")
        }))
        .unwrap();

    let updated = users
        .update(
            &created.id.to_string(),
            Some(&payload(json!({
                "schemas": [CORE_USER_SCHEMA],
                "userName": "erin",
                "name": {"givenName": "Eri"},
                "active": false
            }))),
            UpdateMode::Validated,
        )
        .unwrap();

    assert_eq!(updated.given_name.as_deref(), Some("Eri"));
    assert_eq!(updated.family_name.as_deref(), Some("Smith"));
    assert_eq!(updated.external_id.as_deref(), Some("ext-9"));
    assert_eq!(updated.emails, created.emails);
    assert!(!updated.active);
}

// =============================================================================
// Timestamps
// =============================================================================

/// created_at is fixed; updated_at strictly increases with each update.
#[test]
fn test_timestamps_are_monotonic() {
    let users = lifecycle();
    let created = users.create(Some(&user("frank"))).unwrap();
    let id = created.id.to_string();
    assert_eq!(created.created_at, created.updated_at);

    let mut previous = created.updated_at;
    for _ in 0..5 {
        let updated = users
            .update(&id, Some(&user("frank")), UpdateMode::Validated)
            .unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > previous);
        assert!(updated.updated_at >= updated.created_at);
        previous = updated.updated_at;
    }

    assert_eq!(users.get(&id).unwrap().updated_at, previous);
}

/// A failed update does not touch the stored record.
#[test]
fn test_failed_update_leaves_record() {
    let users = lifecycle();
    let created = users.create(Some(&user("gina"))).unwrap();
    let id = created.id.to_string();

    let result = users.update(&id, Some(&user("bad name")), UpdateMode::Validated);
    assert!(result.is_err());
    assert_eq!(users.get(&id).unwrap(), created);
}
