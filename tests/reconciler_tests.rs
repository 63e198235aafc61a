/// Integration tests for the list reconciler against an in-memory store.
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use userdeck::api::ApiError;
use userdeck::models::{Role, User, UserDraft};
use userdeck::reconciler::{ListReconciler, ReconcileError, UserStore};

/// In-memory stand-in for the backend. Normalizes emails to lowercase on
/// write, like a server would, so tests can tell server responses apart from
/// the submitted draft. Cloning shares state, so a test can keep a handle
/// after moving the store into a reconciler; `fail_next_*` makes exactly one
/// upcoming call fail without touching the stored records.
#[derive(Clone)]
struct FakeStore {
    inner: Arc<Inner>,
}

struct Inner {
    records: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
    fail_next: Mutex<Option<ApiError>>,
    calls: Mutex<usize>,
}

impl FakeStore {
    fn new(seed: Vec<User>) -> Self {
        let next_id = seed.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Inner {
                records: Mutex::new(seed),
                next_id: Mutex::new(next_id),
                fail_next: Mutex::new(None),
                calls: Mutex::new(0),
            }),
        }
    }

    fn fail_next_with_detail(&self, detail: &str) {
        *self.inner.fail_next.lock().unwrap() = Some(ApiError::Server {
            status: 400,
            detail: detail.to_string(),
        });
    }

    fn fail_next_with_transport(&self) {
        *self.inner.fail_next.lock().unwrap() =
            Some(ApiError::Transport("connection refused".to_string()));
    }

    fn calls(&self) -> usize {
        *self.inner.calls.lock().unwrap()
    }

    fn begin_call(&self) -> Result<(), ApiError> {
        *self.inner.calls.lock().unwrap() += 1;
        match self.inner.fail_next.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl UserStore for FakeStore {
    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        self.begin_call()?;
        Ok(self.inner.records.lock().unwrap().clone())
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, ApiError> {
        self.begin_call()?;
        let mut records = self.inner.records.lock().unwrap();
        let mut next_id = self.inner.next_id.lock().unwrap();
        let user = User {
            id: *next_id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_lowercase(),
            role: Role::from_str(&draft.role).unwrap(),
        };
        *next_id += 1;
        records.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, draft: &UserDraft) -> Result<User, ApiError> {
        self.begin_call()?;
        let mut records = self.inner.records.lock().unwrap();
        let Some(slot) = records.iter_mut().find(|u| u.id == id) else {
            return Err(ApiError::Server {
                status: 404,
                detail: "User not found".to_string(),
            });
        };
        slot.name = draft.name.trim().to_string();
        slot.email = draft.email.trim().to_lowercase();
        slot.role = Role::from_str(&draft.role).unwrap();
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.begin_call()?;
        let mut records = self.inner.records.lock().unwrap();
        let before = records.len();
        records.retain(|u| u.id != id);
        if records.len() == before {
            return Err(ApiError::Server {
                status: 404,
                detail: "User not found".to_string(),
            });
        }
        Ok(())
    }
}

fn seed() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            role: Role::Admin,
        },
        User {
            id: 2,
            name: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            role: Role::User,
        },
    ]
}

fn draft(name: &str, email: &str, role: &str) -> UserDraft {
    UserDraft {
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    }
}

#[tokio::test]
async fn reload_populates_the_collection_in_server_order() {
    let mut reconciler = ListReconciler::new(FakeStore::new(seed()));
    assert!(reconciler.users().is_empty());

    reconciler.reload().await.unwrap();
    assert_eq!(reconciler.users().len(), 2);
    assert_eq!(reconciler.users()[0].id, 1);
    assert_eq!(reconciler.users()[1].id, 2);
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_collection() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());
    reconciler.reload().await.unwrap();
    let before = reconciler.users().to_vec();

    store.fail_next_with_transport();
    let err = reconciler.reload().await.unwrap_err();
    assert!(matches!(err, ReconcileError::Fetch(ApiError::Transport(_))));
    assert!(err.detail().is_none());
    assert_eq!(reconciler.users(), &before[..]);
}

#[tokio::test]
async fn create_appends_the_server_assigned_record() {
    let mut reconciler = ListReconciler::new(FakeStore::new(seed()));
    reconciler.reload().await.unwrap();

    let created = reconciler
        .create(&draft("Cleo", "cleo@example.com", "editor"))
        .await
        .unwrap();

    assert_eq!(created.id, 3);
    assert_eq!(reconciler.users().len(), 3);
    assert_eq!(reconciler.users().last().unwrap(), &created);
}

#[tokio::test]
async fn create_with_empty_name_is_rejected_before_any_call() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());

    let err = reconciler
        .create(&draft("   ", "cleo@example.com", "editor"))
        .await
        .unwrap_err();

    let ReconcileError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.name.as_deref(), Some("Name is required"));
    assert_eq!(store.calls(), 0);
    assert!(reconciler.users().is_empty());
}

#[tokio::test]
async fn create_with_malformed_email_makes_no_call() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());
    reconciler.reload().await.unwrap();

    for bad in ["abc", "a@b"] {
        let err = reconciler
            .create(&draft("Cleo", bad, "editor"))
            .await
            .unwrap_err();
        let ReconcileError::Validation(errors) = err else {
            panic!("expected validation failure for {bad}");
        };
        assert_eq!(errors.email.as_deref(), Some("Invalid email format"));
    }
    // only the reload hit the store
    assert_eq!(store.calls(), 1);
    assert_eq!(reconciler.users().len(), 2);
}

#[tokio::test]
async fn failed_create_leaves_the_collection_identical() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());
    reconciler.reload().await.unwrap();
    let before = reconciler.users().to_vec();

    store.fail_next_with_detail("Email already registered");
    let err = reconciler
        .create(&draft("Ann", "ann@example.com", "admin"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Create(_)));
    assert_eq!(err.detail(), Some("Email already registered"));
    assert_eq!(reconciler.users(), &before[..]);
}

#[tokio::test]
async fn update_applies_the_server_response_not_the_draft() {
    let mut reconciler = ListReconciler::new(FakeStore::new(seed()));
    reconciler.reload().await.unwrap();

    // the fake server lowercases emails on write
    let updated = reconciler
        .update(1, &draft("Ann Harper", "ANN@EXAMPLE.COM", "manager"))
        .await
        .unwrap();

    assert_eq!(updated.email, "ann@example.com");
    let local = reconciler.get(1).unwrap();
    assert_eq!(local.email, "ann@example.com");
    assert_eq!(local.name, "Ann Harper");
    assert_eq!(local.role, Role::Manager);
    // position unchanged
    assert_eq!(reconciler.users()[0].id, 1);
    assert_eq!(reconciler.users().len(), 2);
}

#[tokio::test]
async fn update_of_unknown_id_makes_no_call() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());
    reconciler.reload().await.unwrap();

    let err = reconciler
        .update(99, &draft("Ann", "ann@example.com", "admin"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::UnknownId(99)));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn failed_update_leaves_the_collection_identical() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());
    reconciler.reload().await.unwrap();
    let before = reconciler.users().to_vec();

    // server-side rejection after local validation passed
    store.fail_next_with_detail("Email already registered");
    let err = reconciler
        .update(1, &draft("Ann", "bo@example.com", "admin"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Update(_)));
    assert_eq!(err.detail(), Some("Email already registered"));
    assert_eq!(reconciler.users(), &before[..]);
}

#[tokio::test]
async fn remove_drops_the_record_on_success() {
    let mut reconciler = ListReconciler::new(FakeStore::new(seed()));
    reconciler.reload().await.unwrap();

    reconciler.remove(1).await.unwrap();
    assert!(reconciler.get(1).is_none());
    assert_eq!(reconciler.users().len(), 1);
    assert_eq!(reconciler.users()[0].id, 2);
}

#[tokio::test]
async fn failed_remove_keeps_the_record() {
    let store = FakeStore::new(seed());
    let mut reconciler = ListReconciler::new(store.clone());
    reconciler.reload().await.unwrap();
    let before = reconciler.users().to_vec();

    store.fail_next_with_transport();
    let err = reconciler.remove(1).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Delete(ApiError::Transport(_))));
    assert!(err.detail().is_none());
    assert!(reconciler.get(1).is_some());
    assert_eq!(reconciler.users(), &before[..]);
}
