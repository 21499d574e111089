use std::sync::Arc;

use mockall::predicate::eq;
use serde_json::json;

use super::supabase::error_message;
use super::*;
use crate::config::IdentitySettings;

fn user(id: &str, metadata: serde_json::Value) -> AuthUser {
    serde_json::from_value(json!({
        "id": id,
        "email": "me@example.com",
        "user_metadata": metadata,
    }))
    .unwrap()
}

fn session_for(id: &str) -> AuthSession {
    AuthSession {
        access_token: "user-token".to_string(),
        refresh_token: None,
        expires_at: None,
        user: user(id, json!({ "display_name": "Me" })),
    }
}

fn registration() -> SignUpRequest {
    SignUpRequest {
        username: "me".to_string(),
        email: "me@example.com".to_string(),
        phone: "+359888000000".to_string(),
        password: "secret1".to_string(),
    }
}

#[test]
fn email_validation() {
    assert!(is_valid_email("me@example.com"));
    assert!(is_valid_email("first.last+tag@sub.example.co"));
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("me@"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("me@example"));
    assert!(!is_valid_email("me@@example.com"));
    assert!(!is_valid_email("me @example.com"));
    assert!(!is_valid_email("me@example..com"));
}

#[test]
fn login_form_checks_email_then_password() {
    assert_eq!(validate_login("nope", "x"), Err(FormError::InvalidEmail));
    assert_eq!(validate_login("me@example.com", "12345"), Err(FormError::InvalidPassword));
    assert_eq!(validate_login("me@example.com", "123456"), Ok(()));
    assert_eq!(FormError::InvalidPassword.title(), "Invalid password");
}

#[test]
fn registration_form_reports_first_failure_in_form_order() {
    let mut form = registration();
    form.username.clear();
    form.email = "bad".to_string();
    assert_eq!(validate_registration(&form, "secret1"), Err(FormError::UsernameRequired));

    let mut form = registration();
    form.phone.clear();
    assert_eq!(validate_registration(&form, "secret1"), Err(FormError::PhoneRequired));

    let mut form = registration();
    form.password = "abc".to_string();
    assert_eq!(validate_registration(&form, "abc"), Err(FormError::WeakPassword));
    assert_eq!(FormError::WeakPassword.title(), "Weak password");

    let err = validate_registration(&registration(), "secret2").unwrap_err();
    assert_eq!(err, FormError::PasswordMismatch);
    assert_eq!(err.title(), "Passwords do not match");
    assert_eq!(err.to_string(), "Please ensure both passwords are identical.");

    assert_eq!(validate_registration(&registration(), "secret1"), Ok(()));
}

#[test]
fn service_messages_are_classified() {
    let err = IdentityError::classify("sign_in", 400, "Email not confirmed".to_string());
    assert!(matches!(err, IdentityError::EmailNotConfirmed));
    assert!(err.offers_resend());
    assert_eq!(err.title(), "Email not confirmed");

    let err = IdentityError::classify("sign_up", 429, "email rate limit exceeded".to_string());
    assert!(matches!(err, IdentityError::RateLimited));
    assert_eq!(err.title(), "Too many attempts.");

    let err = IdentityError::classify("sign_in", 400, "Invalid login credentials".to_string());
    assert!(matches!(err, IdentityError::InvalidCredentials(_)));
    assert!(!err.offers_resend());

    let err = IdentityError::classify("update_profile", 500, "boom".to_string());
    assert_eq!(err.to_string(), "update_profile failed: HTTP 500: boom");
}

#[test]
fn error_message_reads_known_body_shapes() {
    assert_eq!(error_message(br#"{"code":400,"msg":"Email not confirmed"}"#), "Email not confirmed");
    assert_eq!(
        error_message(br#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
        "Invalid login credentials"
    );
    assert_eq!(error_message(br#"{"message":"new row violates policy"}"#), "new row violates policy");
    assert_eq!(error_message(b"Bad Gateway\n"), "Bad Gateway");
}

#[test]
fn profile_defaults_display_name() {
    let profile = UserProfile::from(&user("u1", json!({})));
    assert_eq!(profile.display_name, "No display name");
    assert_eq!(profile.avatar_url, None);
    assert_eq!(profile.email.as_deref(), Some("me@example.com"));

    let profile = UserProfile::from(&user(
        "u1",
        json!({ "display_name": "Me", "avatar_url": "https://cdn/a.png", "bio": "", "phone": "123" }),
    ));
    assert_eq!(profile.display_name, "Me");
    assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn/a.png"));
    assert_eq!(profile.bio, None);
    assert_eq!(profile.phone.as_deref(), Some("123"));
}

#[test]
fn session_decodes_token_response() {
    let session: AuthSession = serde_json::from_value(json!({
        "access_token": "jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_700_000_000,
        "refresh_token": "refresh",
        "user": {
            "id": "u1",
            "email": "me@example.com",
            "last_sign_in_at": "2024-09-08T10:00:00Z",
            "user_metadata": { "display_name": "Me" }
        }
    }))
    .unwrap();

    assert_eq!(session.user.id, "u1");
    assert!(session.user.last_sign_in_at.is_some());
    let after = chrono::DateTime::from_timestamp(1_700_000_001, 0).unwrap();
    let before = chrono::DateTime::from_timestamp(1_699_999_000, 0).unwrap();
    assert!(session.is_expired(after));
    assert!(!session.is_expired(before));
}

#[test]
fn profile_update_skips_unset_columns() {
    let update = ProfileUpdate {
        bio: Some("hi".to_string()),
        ..ProfileUpdate::default()
    };
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "bio": "hi" }));
    assert!(ProfileUpdate::default().is_empty());
}

#[test]
fn public_avatar_url_uses_bucket() {
    let settings = IdentitySettings {
        url: "https://project.supabase.co/".to_string(),
        anon_key: "anon".to_string(),
        ..IdentitySettings::default()
    };
    let identity = SupabaseIdentity::new(&settings);
    assert_eq!(
        identity.public_avatar_url("avatars/u1.png"),
        "https://project.supabase.co/storage/v1/object/public/avatars/avatars/u1.png"
    );
}

#[tokio::test]
async fn invalid_login_form_makes_no_request() {
    let service = MockIdentityService::new();
    let account = Account::new(Arc::new(service));

    let err = account.sign_in("not-an-email", "secret1").await.unwrap_err();
    assert!(matches!(err, IdentityError::Form(FormError::InvalidEmail)));
    assert_eq!(err.title(), "Invalid email");
    assert!(account.session().await.is_none());
}

#[tokio::test]
async fn sign_in_stores_session_and_loads_profile() {
    let mut service = MockIdentityService::new();
    service
        .expect_sign_in()
        .with(eq("me@example.com"), eq("secret1"))
        .times(1)
        .returning(|_, _| Ok(session_for("u1")));
    service
        .expect_get_user()
        .with(eq("user-token"))
        .times(1)
        .returning(|_| Ok(user("u1", json!({ "display_name": "Renamed" }))));

    let account = Account::new(Arc::new(service));
    let profile = account.sign_in("me@example.com", "secret1").await.unwrap();
    assert_eq!(profile.display_name, "Me");
    assert_eq!(account.session().await.unwrap().user.id, "u1");

    let profile = account.profile().await.unwrap();
    assert_eq!(profile.display_name, "Renamed");

    account.sign_out().await;
    assert!(account.profile().await.is_none());
}

#[tokio::test]
async fn unconfirmed_email_offers_resend() {
    let mut service = MockIdentityService::new();
    service
        .expect_sign_in()
        .returning(|_, _| Err(IdentityError::classify("sign_in", 400, "Email not confirmed".to_string())));
    service
        .expect_resend_verification()
        .with(eq("me@example.com"))
        .times(1)
        .returning(|_| Ok(()));

    let account = Account::new(Arc::new(service));
    let err = account.sign_in("me@example.com", "secret1").await.unwrap_err();
    assert!(err.offers_resend());
    account.resend_verification("me@example.com").await.unwrap();
    assert!(account.session().await.is_none());
}

#[tokio::test]
async fn sign_up_validates_before_submitting() {
    let mut service = MockIdentityService::new();
    service
        .expect_sign_up()
        .withf(|req| req.username == "me" && req.phone == "+359888000000")
        .times(1)
        .returning(|_| Ok(()));

    let account = Account::new(Arc::new(service));
    let err = account.sign_up(&registration(), "different").await.unwrap_err();
    assert!(matches!(err, IdentityError::Form(FormError::PasswordMismatch)));

    account.sign_up(&registration(), "secret1").await.unwrap();
}

#[tokio::test]
async fn profile_changes_require_a_session() {
    let account = Account::new(Arc::new(MockIdentityService::new()));
    let update = ProfileUpdate {
        display_name: Some("New".to_string()),
        ..ProfileUpdate::default()
    };

    let err = account.update_profile(&update).await.unwrap_err();
    assert!(matches!(err, IdentityError::NotSignedIn));
    assert!(account.update_profile(&ProfileUpdate::default()).await.is_ok());
}

#[tokio::test]
async fn change_avatar_uploads_and_records_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("picked.PNG");
    std::fs::write(&path, b"png-bytes").unwrap();

    let mut service = MockIdentityService::new();
    service.expect_sign_in().returning(|_, _| Ok(session_for("u1")));
    service
        .expect_upload_avatar()
        .withf(|session, object_path, content_type, data| {
            session.user.id == "u1"
                && object_path.to_string() == "avatars/u1.png"
                && content_type.to_string() == "image/png"
                && &data[..] == b"png-bytes"
        })
        .times(1)
        .returning(|_, path, _, _| Ok(format!("https://cdn/{}", path)));
    service
        .expect_update_profile()
        .withf(|_, update| update.avatar_url.as_deref() == Some("https://cdn/avatars/u1.png") && update.bio.is_none())
        .times(1)
        .returning(|_, _| Ok(()));

    let account = Account::new(Arc::new(service));
    account.sign_in("me@example.com", "secret1").await.unwrap();

    let url = account.change_avatar(&path).await.unwrap();
    assert_eq!(url, "https://cdn/avatars/u1.png");
}
