use chrono::{Duration, Utc};
use uuid::Uuid;

use credence_auth::domain::types::{VerificationPurpose, VERIFICATION_CODE_LEN};
use credence_auth::error::AuthServiceError;
use credence_auth::password::verify_password;
use credence_auth::usecase::credential::{
    ChangePasswordInput, ChangePasswordUseCase, ForgotPasswordUseCase, LoginInput, LoginOutput,
    LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase, ResetPasswordInput,
    ResetPasswordUseCase, VerifyEmailUseCase,
};

use crate::helpers::{
    MockCodeRepo, MockMailer, MockSessionRepo, MockUserRepo, TEST_PASSWORD, test_code,
    test_session, test_token_config, test_user,
};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        name: "Ann Example".to_owned(),
        email: email.to_owned(),
        password: TEST_PASSWORD.to_owned(),
        confirm_password: TEST_PASSWORD.to_owned(),
    }
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_account_and_send_verification_email() {
    let users = MockUserRepo::empty();
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    let users_handle = users.users_handle();
    let codes_handle = codes.codes_handle();
    let sent_handle = mailer.sent_handle();

    let usecase = RegisterUseCase {
        users,
        codes,
        mailer,
        app_origin: "https://app.example.com".to_owned(),
    };

    let view = usecase
        .execute(register_input("ann@example.com"))
        .await
        .unwrap();
    assert_eq!(view.email, "ann@example.com");

    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert!(!users[0].email_verified);
    assert!(!users[0].mfa_enabled);
    // The stored hash is not the raw password and verifies against it.
    assert_ne!(users[0].password_hash, TEST_PASSWORD);
    assert!(verify_password(TEST_PASSWORD, &users[0].password_hash));

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].purpose, VerificationPurpose::EmailVerification);
    assert_eq!(codes[0].code.len(), VERIFICATION_CODE_LEN);
    // The code lives exactly 45 minutes from its creation.
    assert_eq!(
        codes[0].expires_at - codes[0].created_at,
        Duration::minutes(45)
    );

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ann@example.com");
    assert!(sent[0].html.contains(&codes[0].code));
}

#[tokio::test]
async fn should_reject_duplicate_email_on_register() {
    let existing = test_user();
    let usecase = RegisterUseCase {
        users: MockUserRepo::new(vec![existing.clone()]),
        codes: MockCodeRepo::empty(),
        mailer: MockMailer::new(),
        app_origin: "https://app.example.com".to_owned(),
    };

    let result = usecase.execute(register_input(&existing.email)).await;
    assert!(matches!(result, Err(AuthServiceError::DuplicateAccount)));
}

#[tokio::test]
async fn should_reject_mismatched_password_confirmation() {
    let usecase = RegisterUseCase {
        users: MockUserRepo::empty(),
        codes: MockCodeRepo::empty(),
        mailer: MockMailer::new(),
        app_origin: "https://app.example.com".to_owned(),
    };

    let mut input = register_input("ann@example.com");
    input.confirm_password = "something else entirely".to_owned();
    let result = usecase.execute(input).await;
    assert!(matches!(result, Err(AuthServiceError::Validation(_))));
}

#[tokio::test]
async fn should_retain_account_when_verification_email_fails() {
    let users = MockUserRepo::empty();
    let codes = MockCodeRepo::empty();
    let users_handle = users.users_handle();
    let codes_handle = codes.codes_handle();

    let usecase = RegisterUseCase {
        users,
        codes,
        mailer: MockMailer::failing(),
        app_origin: "https://app.example.com".to_owned(),
    };

    let result = usecase.execute(register_input("ann@example.com")).await;
    assert!(matches!(result, Err(AuthServiceError::EmailDeliveryFailed)));

    // No compensation: the account and its code survive the delivery failure.
    assert_eq!(users_handle.lock().unwrap().len(), 1);
    assert_eq!(codes_handle.lock().unwrap().len(), 1);
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_and_open_session_with_token_pair() {
    let user = test_user();
    let sessions = MockSessionRepo::empty();
    let sessions_handle = sessions.sessions_handle();

    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions,
        tokens: test_token_config(),
    };

    let out = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
            user_agent: Some("test-agent".to_owned()),
        })
        .await
        .unwrap();

    let LoginOutput::LoggedIn { user: view, tokens } = out else {
        panic!("expected LoggedIn");
    };
    assert_eq!(view.id, user.id);
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert_ne!(tokens.access_token, tokens.refresh_token);

    let sessions = sessions_handle.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].user_id, user.id);
    assert!(sessions[0].expires_at > Utc::now() + Duration::days(29));
}

#[tokio::test]
async fn should_reject_unknown_email_and_wrong_password_identically() {
    let user = test_user();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: MockSessionRepo::empty(),
        tokens: test_token_config(),
    };

    let unknown = usecase
        .execute(LoginInput {
            email: "nobody@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
            user_agent: None,
        })
        .await
        .unwrap_err();
    let wrong = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: "wrong password".to_owned(),
            user_agent: None,
        })
        .await
        .unwrap_err();

    // Neither response reveals whether the account exists.
    assert_eq!(unknown.kind(), "INVALID_CREDENTIALS");
    assert_eq!(wrong.kind(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn should_defer_session_creation_when_mfa_enabled() {
    let mut user = test_user();
    user.mfa_enabled = true;
    user.mfa_secret = Some("JBSWY3DPEHPK3PXP".to_owned());

    let sessions = MockSessionRepo::empty();
    let sessions_handle = sessions.sessions_handle();

    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions,
        tokens: test_token_config(),
    };

    let out = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
            user_agent: None,
        })
        .await
        .unwrap();

    assert!(matches!(out, LoginOutput::MfaRequired { .. }));
    assert!(sessions_handle.lock().unwrap().is_empty());
}

// ── VerifyEmailUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_email_and_consume_code() {
    let user = test_user();
    let code = test_code(user.id, VerificationPurpose::EmailVerification);
    let code_str = code.code.clone();

    let users = MockUserRepo::new(vec![user.clone()]);
    let codes = MockCodeRepo::new(vec![code]);
    let users_handle = users.users_handle();
    let codes_handle = codes.codes_handle();

    let usecase = VerifyEmailUseCase { users, codes };
    usecase.execute(&code_str).await.unwrap();

    assert!(users_handle.lock().unwrap()[0].email_verified);
    assert!(codes_handle.lock().unwrap().is_empty());

    // The code is single-use.
    let again = VerifyEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        codes: MockCodeRepo::new(vec![]),
    };
    let result = again.execute(&code_str).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)));
}

#[tokio::test]
async fn should_reject_expired_verification_code() {
    let user = test_user();
    let mut code = test_code(user.id, VerificationPurpose::EmailVerification);
    code.expires_at = Utc::now() - Duration::seconds(1);
    let code_str = code.code.clone();

    let usecase = VerifyEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        codes: MockCodeRepo::new(vec![code]),
    };
    let result = usecase.execute(&code_str).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)));
}

#[tokio::test]
async fn should_reject_reset_code_for_email_verification() {
    let user = test_user();
    let code = test_code(user.id, VerificationPurpose::PasswordReset);
    let code_str = code.code.clone();

    let usecase = VerifyEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        codes: MockCodeRepo::new(vec![code]),
    };
    let result = usecase.execute(&code_str).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)));
}

// ── ForgotPasswordUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_send_reset_code_with_one_hour_expiry() {
    let user = test_user();
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    let codes_handle = codes.codes_handle();
    let sent_handle = mailer.sent_handle();

    let usecase = ForgotPasswordUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        codes,
        mailer,
        app_origin: "https://app.example.com".to_owned(),
    };
    usecase.execute(&user.email).await.unwrap();

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].purpose, VerificationPurpose::PasswordReset);
    assert_eq!(codes[0].expires_at - codes[0].created_at, Duration::hours(1));

    assert_eq!(sent_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_rate_limit_reset_requests_within_window() {
    let user = test_user();
    let recent: Vec<_> = (0..2)
        .map(|_| {
            let mut c = test_code(user.id, VerificationPurpose::PasswordReset);
            c.code = Uuid::new_v4().to_string();
            c
        })
        .collect();

    let usecase = ForgotPasswordUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        codes: MockCodeRepo::new(recent),
        mailer: MockMailer::new(),
        app_origin: "https://app.example.com".to_owned(),
    };
    let result = usecase.execute(&user.email).await;
    assert!(matches!(result, Err(AuthServiceError::TooManyAttempts)));
}

#[tokio::test]
async fn should_not_count_codes_outside_rate_window() {
    let user = test_user();
    let old: Vec<_> = (0..2)
        .map(|_| {
            let mut c = test_code(user.id, VerificationPurpose::PasswordReset);
            c.code = Uuid::new_v4().to_string();
            c.created_at = Utc::now() - Duration::minutes(10);
            c
        })
        .collect();

    let usecase = ForgotPasswordUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        codes: MockCodeRepo::new(old),
        mailer: MockMailer::new(),
        app_origin: "https://app.example.com".to_owned(),
    };
    assert!(usecase.execute(&user.email).await.is_ok());
}

#[tokio::test]
async fn should_report_not_found_for_unknown_reset_email() {
    let usecase = ForgotPasswordUseCase {
        users: MockUserRepo::empty(),
        codes: MockCodeRepo::empty(),
        mailer: MockMailer::new(),
        app_origin: "https://app.example.com".to_owned(),
    };
    let result = usecase.execute("nobody@example.com").await;
    assert!(matches!(result, Err(AuthServiceError::NotFound)));
}

// ── ResetPasswordUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_and_revoke_all_sessions() {
    let user = test_user();
    let code = test_code(user.id, VerificationPurpose::PasswordReset);
    let code_str = code.code.clone();

    let users = MockUserRepo::new(vec![user.clone()]);
    let sessions = MockSessionRepo::new(vec![
        test_session(user.id, Utc::now() + Duration::days(30)),
        test_session(user.id, Utc::now() + Duration::days(15)),
    ]);
    let codes = MockCodeRepo::new(vec![code]);
    let users_handle = users.users_handle();
    let sessions_handle = sessions.sessions_handle();
    let codes_handle = codes.codes_handle();

    let usecase = ResetPasswordUseCase {
        users,
        codes,
        sessions,
    };
    usecase
        .execute(ResetPasswordInput {
            password: "a brand new passphrase".to_owned(),
            verification_code: code_str,
        })
        .await
        .unwrap();

    let users = users_handle.lock().unwrap();
    assert!(verify_password("a brand new passphrase", &users[0].password_hash));
    assert!(!verify_password(TEST_PASSWORD, &users[0].password_hash));

    assert!(sessions_handle.lock().unwrap().is_empty());
    assert!(codes_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_reset_with_invalid_code() {
    let usecase = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        codes: MockCodeRepo::empty(),
        sessions: MockSessionRepo::empty(),
    };
    let result = usecase
        .execute(ResetPasswordInput {
            password: "a brand new passphrase".to_owned(),
            verification_code: "no-such-code".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)));
}

// ── ChangePasswordUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password_and_force_relogin() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let sessions = MockSessionRepo::new(vec![test_session(
        user.id,
        Utc::now() + Duration::days(30),
    )]);
    let users_handle = users.users_handle();
    let sessions_handle = sessions.sessions_handle();

    let usecase = ChangePasswordUseCase { users, sessions };
    usecase
        .execute(
            user.id,
            ChangePasswordInput {
                old_password: TEST_PASSWORD.to_owned(),
                new_password: "a brand new passphrase".to_owned(),
            },
        )
        .await
        .unwrap();

    let users = users_handle.lock().unwrap();
    assert!(verify_password("a brand new passphrase", &users[0].password_hash));
    assert!(sessions_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_change_with_wrong_current_password() {
    let user = test_user();
    let usecase = ChangePasswordUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: MockSessionRepo::empty(),
    };
    let result = usecase
        .execute(
            user.id,
            ChangePasswordInput {
                old_password: "wrong password".to_owned(),
                new_password: "a brand new passphrase".to_owned(),
            },
        )
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

// ── LogoutUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_logout_and_tolerate_missing_session() {
    let user = test_user();
    let session = test_session(user.id, Utc::now() + Duration::days(30));
    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let sessions_handle = sessions.sessions_handle();

    let usecase = LogoutUseCase { sessions };
    usecase.execute(session.id).await.unwrap();
    assert!(sessions_handle.lock().unwrap().is_empty());

    // Logging out the same session again is not an error.
    usecase.execute(session.id).await.unwrap();
}
