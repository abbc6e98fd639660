//! End-to-end tests of the reqwest clients against a local backend.

mod common;

use std::sync::Arc;

use common::{FakeBackend, EXISTING_PHONE, FAILING_PHONE, VALID_CODE};
use otp_login::store::{ACCESS_TOKEN, PHONE_FOR_SIGNUP, REFRESH_TOKEN, REGISTRATION_TOKEN};
use otp_login::testing::RecordingNavigator;
use otp_login::{
    messages, AccountsApi, ApiError, CodeOutcome, Destination, HttpAccountsApi, LoginController,
    LoginDeps, LoginSettings, LoginStep, MemoryTokenStore, PhoneOutcome, QueueClient,
    QueueStatusResponse, TimerService, TokenStore,
};
use serde_json::json;
use test_context::test_context;

fn controller(
    backend: &FakeBackend,
) -> (LoginController, Arc<MemoryTokenStore>, Arc<RecordingNavigator>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let deps = LoginDeps {
        accounts: Arc::new(HttpAccountsApi::new(backend.accounts_url()).unwrap()),
        tokens: tokens.clone(),
        navigator: navigator.clone(),
    };
    let login = LoginController::new(deps, TimerService::default(), LoginSettings::default());
    (login, tokens, navigator)
}

// ============================================================================
// Accounts API
// ============================================================================

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_send_code_posts_phone_number(ctx: &FakeBackend) {
    let api = HttpAccountsApi::new(ctx.accounts_url()).unwrap();

    api.send_code("09123456789").await.unwrap();

    assert_eq!(
        ctx.requests(),
        vec![(
            "send-code".to_string(),
            json!({ "phone_number": "09123456789" })
        )]
    );
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_send_code_failure_is_rejected(ctx: &FakeBackend) {
    let api = HttpAccountsApi::new(ctx.accounts_url()).unwrap();

    let err = api.send_code(FAILING_PHONE).await.unwrap_err();

    match err {
        ApiError::Rejected { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, None);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_verify_code_surfaces_server_error(ctx: &FakeBackend) {
    let api = HttpAccountsApi::new(ctx.accounts_url()).unwrap();

    let err = api.verify_code("09123456789", "00000").await.unwrap_err();

    assert_eq!(err.server_message(), Some("Code is invalid or expired"));
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_unreachable_backend_is_network_error(_ctx: &FakeBackend) {
    // Port 9 (discard) on localhost is not listening
    let api = HttpAccountsApi::new("http://127.0.0.1:9/api/accounts").unwrap();

    let err = api.send_code("09123456789").await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

// ============================================================================
// Full Login Flow
// ============================================================================

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_new_user_flow_over_http(ctx: &FakeBackend) {
    let (mut login, tokens, navigator) = controller(ctx);

    assert_eq!(login.submit_phone("09123456789").await, PhoneOutcome::CodeSent);
    login.paste_code(VALID_CODE);
    assert_eq!(login.submit_code().await, CodeOutcome::SignupRequired);

    assert_eq!(
        tokens.get(REGISTRATION_TOKEN).unwrap().as_deref(),
        Some("registration-jwt")
    );
    assert_eq!(
        tokens.get(PHONE_FOR_SIGNUP).unwrap().as_deref(),
        Some("09123456789")
    );
    assert_eq!(navigator.visited(), vec![Destination::Signup]);

    let requests = ctx.requests();
    assert_eq!(
        requests.last().unwrap().1,
        json!({ "phone_number": "09123456789", "code": VALID_CODE })
    );
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_existing_user_flow_over_http(ctx: &FakeBackend) {
    let (mut login, tokens, navigator) = controller(ctx);

    login.submit_phone(EXISTING_PHONE).await;
    for (i, digit) in VALID_CODE.chars().enumerate() {
        login.input_digit(i, &digit.to_string());
    }
    assert_eq!(login.submit_code().await, CodeOutcome::Authenticated);

    assert_eq!(login.step(), LoginStep::Authenticated);
    assert_eq!(tokens.get(ACCESS_TOKEN).unwrap().as_deref(), Some("access-jwt"));
    assert_eq!(tokens.get(REFRESH_TOKEN).unwrap().as_deref(), Some("refresh-jwt"));
    assert_eq!(navigator.last(), Some(Destination::Dashboard));
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_wrong_code_over_http_keeps_code_step(ctx: &FakeBackend) {
    let (mut login, tokens, navigator) = controller(ctx);

    login.submit_phone("09123456789").await;
    login.paste_code("99999");
    assert_eq!(login.submit_code().await, CodeOutcome::Rejected);

    assert_eq!(login.step(), LoginStep::CodeVerification);
    assert_eq!(
        login.draft().code_error_message(),
        Some("Code is invalid or expired")
    );
    assert!(tokens.snapshot().is_empty());
    assert!(navigator.visited().is_empty());
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_send_failure_over_http_shows_generic_error(ctx: &FakeBackend) {
    let (mut login, _tokens, _navigator) = controller(ctx);

    assert_eq!(login.submit_phone(FAILING_PHONE).await, PhoneOutcome::SendFailed);
    assert_eq!(
        login.draft().phone_error.as_deref(),
        Some(messages::SEND_FAILED)
    );
}

// ============================================================================
// Queue Status
// ============================================================================

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_ticket_status_with_access_token(ctx: &FakeBackend) {
    let client = QueueClient::new(&ctx.api_url)
        .unwrap()
        .with_access_token("access-jwt");

    let response = client.ticket_status(3, 7).await.unwrap();

    match response {
        QueueStatusResponse::Status(status) => {
            assert!(status.is_user_exists);
            assert_eq!(status.people_in_queue, 2);
            assert_eq!(status.wait_until, 300);
            assert_eq!(status.user_breads.unwrap()["Barbari"], 2);
            assert_eq!(status.data, Some(json!({ "token": "access-jwt" })));
        }
        other => panic!("expected status, got {:?}", other),
    }
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_ticket_status_anonymous(ctx: &FakeBackend) {
    let client = QueueClient::new(&ctx.api_url).unwrap();

    let response = client.ticket_status(3, 1).await.unwrap();

    match response {
        QueueStatusResponse::Status(status) => {
            assert!(!status.is_user_exists);
            assert!(status.user_breads.is_none());
            assert!(status.data.is_none());
        }
        other => panic!("expected status, got {:?}", other),
    }
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_ticket_status_unknown_bakery(ctx: &FakeBackend) {
    let client = QueueClient::new(&ctx.api_url).unwrap();

    let response = client.ticket_status(404, 1).await.unwrap();

    assert_eq!(
        response,
        QueueStatusResponse::Message {
            msg: "bakery does not exist".to_string()
        }
    );
}

#[test_context(FakeBackend)]
#[tokio::test]
async fn test_ticket_status_server_error(ctx: &FakeBackend) {
    let client = QueueClient::new(&ctx.api_url).unwrap();

    let err = client.ticket_status(500, 1).await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected { status: 500, .. }));
}
