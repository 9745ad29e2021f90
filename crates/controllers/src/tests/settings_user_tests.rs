use super::*;
use crate::{
    dialog::DialogResult, events::FailureCategory, i18n::MessageCatalog, navigation::EDIT_USER_STATE,
    test_support::*,
};

struct Harness {
    api: Arc<FakeDocsApi>,
    dialogs: Arc<FakeDialogs>,
    navigator: Arc<FakeNavigator>,
    controller: SettingsUserController,
}

fn harness() -> Harness {
    harness_with(MessageCatalog::default())
}

fn harness_with(catalog: MessageCatalog) -> Harness {
    let api = FakeDocsApi::default();
    *api.users.lock().expect("lock") = vec![user("admin"), user("guest")];
    *api.requests.lock().expect("lock") = vec![
        registration_request("r-1", "alice"),
        registration_request("r-2", "bob"),
    ];
    let api = Arc::new(api);
    let dialogs = Arc::new(FakeDialogs::default());
    let navigator = Arc::new(FakeNavigator::at("settings.user"));
    let controller = SettingsUserController::new(
        api.clone(),
        dialogs.clone(),
        Arc::new(catalog),
        navigator.clone(),
    );
    Harness {
        api,
        dialogs,
        navigator,
        controller,
    }
}

fn approvable(id: &str, username: &str, password: &str, quota_mb: Option<u64>) -> PendingRequest {
    PendingRequest {
        request: registration_request(id, username),
        password: password.to_string(),
        storage_quota_mb: quota_mb,
    }
}

#[tokio::test]
async fn load_data_fetches_both_lists_and_initializes_local_fields() {
    let mut h = harness();

    h.controller.load_data().await;

    assert_eq!(h.controller.users().len(), 2);
    assert_eq!(h.controller.requests().len(), 2);
    for pending in h.controller.requests() {
        assert_eq!(pending.password, "");
        assert_eq!(pending.storage_quota_mb, Some(0));
    }
    let calls = h.api.calls();
    assert!(calls.contains(&ApiCall::ListUsers {
        sort: UserSort {
            column: 1,
            ascending: true
        }
    }));
    assert!(calls.contains(&ApiCall::ListRegisterRequests));
}

#[tokio::test]
async fn load_data_replaces_rather_than_merges() {
    let mut h = harness();
    h.controller.load_data().await;
    if let Some(pending) = h.controller.request_mut(&RequestId::new("r-1")) {
        pending.password = "typed-but-unsaved".into();
    }

    *h.api.users.lock().expect("lock") = vec![user("solo")];
    *h.api.requests.lock().expect("lock") = vec![registration_request("r-3", "carol")];
    h.controller.load_data().await;
    h.controller.load_data().await;

    assert_eq!(
        h.controller
            .users()
            .iter()
            .map(|u| u.username.as_str())
            .collect::<Vec<_>>(),
        vec!["solo"]
    );
    assert_eq!(h.controller.requests().len(), 1);
    assert_eq!(h.controller.requests()[0].request.id, RequestId::new("r-3"));
    assert_eq!(h.controller.requests()[0].password, "");
}

#[tokio::test]
async fn failed_list_keeps_previous_slice() {
    let mut h = harness();
    h.controller.load_data().await;

    *h.api.users.lock().expect("lock") = vec![user("new")];
    h.api.fail(LIST_REQUESTS, typed_error("ForbiddenError"));
    h.controller.load_data().await;

    assert_eq!(h.controller.users()[0].username, "new");
    assert_eq!(h.controller.requests().len(), 2);
    assert!(h.dialogs.shown().is_empty());
}

#[tokio::test]
async fn failed_user_list_keeps_previous_users() {
    let mut h = harness();
    h.controller.load_data().await;

    h.api.fail(LIST_USERS, typed_error("ForbiddenError"));
    *h.api.requests.lock().expect("lock") = vec![registration_request("r-3", "carol")];
    h.controller.load_data().await;

    assert_eq!(h.controller.users().len(), 2);
    assert_eq!(h.controller.requests().len(), 1);
}

#[tokio::test]
async fn custom_sort_is_forwarded() {
    let h = harness();
    let sort = UserSort {
        column: 4,
        ascending: false,
    };
    let mut controller = h.controller.with_sort(sort);

    controller.load_data().await;

    assert!(h.api.calls().contains(&ApiCall::ListUsers { sort }));
}

#[test]
fn edit_user_navigates_by_username() {
    let h = harness();

    h.controller.edit_user(&user("guest"));

    let visits = h.navigator.visits();
    assert_eq!(
        visits,
        vec![NavigationTarget::EditUser {
            username: "guest".into()
        }]
    );
    assert_eq!(visits[0].state_name(), EDIT_USER_STATE);
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn approve_without_password_or_quota_never_calls_the_api() {
    for pending in [
        approvable("r-1", "alice", "", Some(10)),
        approvable("r-1", "alice", "s3cret-pass", None),
    ] {
        let mut h = harness();

        let outcome = h.controller.approve_request(&pending).await;

        let ApproveOutcome::Failed(failure) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(failure.category(), FailureCategory::Validation);
        assert!(h.api.calls().is_empty());
        let shown = h.dialogs.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, keys::APPROVE_ERROR_TITLE);
        assert_eq!(shown[0].message, keys::APPROVE_ERROR_MESSAGE);
    }
}

#[tokio::test]
async fn zero_quota_is_defined_and_sent_as_zero_bytes() {
    let mut h = harness();

    let outcome = h
        .controller
        .approve_request(&approvable("r-1", "alice", "s3cret-pass", Some(0)))
        .await;

    assert!(matches!(outcome, ApproveOutcome::Approved));
    assert_eq!(
        h.api.calls()[0],
        ApiCall::ApproveRegisterRequest {
            request_id: RequestId::new("r-1"),
            password: "s3cret-pass".into(),
            storage_quota_bytes: 0,
        }
    );
}

#[tokio::test]
async fn approve_converts_megabytes_to_decimal_bytes_and_reloads() {
    let mut h = harness();

    let outcome = h
        .controller
        .approve_request(&approvable("r-2", "bob", "s3cret-pass", Some(5)))
        .await;

    assert!(matches!(outcome, ApproveOutcome::Approved));
    let calls = h.api.calls();
    assert_eq!(
        calls[0],
        ApiCall::ApproveRegisterRequest {
            request_id: RequestId::new("r-2"),
            password: "s3cret-pass".into(),
            storage_quota_bytes: 5_000_000,
        }
    );
    assert!(calls[1..].contains(&ApiCall::ListRegisterRequests));
    assert_eq!(h.controller.requests().len(), 2);
    let shown = h.dialogs.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, keys::APPROVE_SUCCESS_TITLE);
}

#[tokio::test]
async fn approve_quota_overflow_is_a_validation_error() {
    let mut h = harness();

    let outcome = h
        .controller
        .approve_request(&approvable("r-1", "alice", "s3cret-pass", Some(u64::MAX)))
        .await;

    assert!(matches!(outcome, ApproveOutcome::Failed(_)));
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn approve_failure_messages_depend_on_error_type() {
    for (payload, expected_key) in [
        (
            typed_error("AlreadyExistingUsername"),
            keys::APPROVE_ERROR_USERNAME_EXISTS,
        ),
        (typed_error("RequestNotFound"), keys::APPROVE_ERROR_MESSAGE),
        (shared::error::ErrorPayload::default(), keys::APPROVE_ERROR_MESSAGE),
    ] {
        let mut h = harness();
        h.api.fail(APPROVE, payload);

        let outcome = h
            .controller
            .approve_request(&approvable("r-1", "alice", "s3cret-pass", Some(1)))
            .await;

        assert!(matches!(outcome, ApproveOutcome::Failed(_)));
        assert_eq!(h.api.calls().len(), 1);
        let shown = h.dialogs.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, keys::APPROVE_ERROR_TITLE);
        assert_eq!(shown[0].message, expected_key);
    }
}

#[tokio::test]
async fn reject_calls_api_only_after_ok() {
    let mut h = harness();
    h.dialogs.answer(Some(DialogResult::Ok));
    let pending = PendingRequest::from(registration_request("r-2", "bob"));

    let outcome = h.controller.reject_request(&pending).await;

    assert!(matches!(outcome, RejectOutcome::Rejected));
    let calls = h.api.calls();
    assert_eq!(
        calls[0],
        ApiCall::RejectRegisterRequest {
            request_id: RequestId::new("r-2")
        }
    );
    assert!(calls[1..].contains(&ApiCall::ListRegisterRequests));
    let shown = h.dialogs.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, keys::REJECT_CONFIRM_TITLE);
    assert_eq!(
        shown[0].buttons.iter().map(|b| b.result).collect::<Vec<_>>(),
        vec![DialogResult::Cancel, DialogResult::Ok]
    );
}

#[tokio::test]
async fn reject_confirmation_names_the_requester() {
    let catalog = MessageCatalog::from_toml_str(
        r#"
            [settings.user]
            reject_confirm_message = "Reject {{ username }} ({{email}})?"
        "#,
    )
    .expect("catalog");
    let mut h = harness_with(catalog);
    h.dialogs.answer(Some(DialogResult::Cancel));
    let pending = PendingRequest::from(registration_request("r-1", "alice"));

    h.controller.reject_request(&pending).await;

    assert_eq!(
        h.dialogs.shown()[0].message,
        "Reject alice (alice@example.com)?"
    );
}

#[tokio::test]
async fn reject_cancelled_or_dismissed_sends_nothing() {
    for answer in [Some(DialogResult::Cancel), None] {
        let mut h = harness();
        h.dialogs.answer(answer);
        let pending = PendingRequest::from(registration_request("r-1", "alice"));

        let outcome = h.controller.reject_request(&pending).await;

        assert!(matches!(outcome, RejectOutcome::Cancelled));
        assert!(h.api.calls().is_empty());
        assert!(h.controller.requests().is_empty());
    }
}

#[tokio::test]
async fn failed_reject_still_reloads() {
    let mut h = harness();
    h.api.fail(REJECT, typed_error("RequestNotFound"));
    let pending = PendingRequest::from(registration_request("r-9", "zed"));

    let outcome = h.controller.reject_request(&pending).await;

    assert!(matches!(outcome, RejectOutcome::Failed(_)));
    assert!(h.api.calls().contains(&ApiCall::ListRegisterRequests));
    assert_eq!(h.controller.requests().len(), 2);
    assert_eq!(h.dialogs.shown().len(), 1);
}

#[test]
fn validation_accepts_zero_and_rejects_missing_fields() {
    assert_eq!(
        validate_approval(&approvable("r", "u", "pw", Some(0))).expect("valid"),
        0
    );
    assert_eq!(
        validate_approval(&approvable("r", "u", "pw", Some(5))).expect("valid"),
        5_000_000
    );
    assert!(validate_approval(&approvable("r", "u", "", Some(5))).is_err());
    assert!(validate_approval(&approvable("r", "u", "pw", None)).is_err());
}
