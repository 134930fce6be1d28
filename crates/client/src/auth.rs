//! Login, registration and logout.
//!
//! Successful calls update the client's [`SessionStore`](crate::SessionStore);
//! a registration signs the new user in straight away.

use secrecy::SecretString;
use tracing::{info, instrument};
use vetrina_core::{LoginRequest, LoginResponse, RegisterRequest};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionAction;

/// Sign in with a username (trimmed) and password (sent as typed).
///
/// # Errors
///
/// Returns `ApiError` if the backend rejects the credentials or is
/// unreachable. The session is left unchanged in that case.
#[instrument(skip(api, password))]
pub async fn login(api: &ApiClient, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let request = LoginRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    let response: LoginResponse = api.post_json("/api/auth/login", &request).await?;
    sign_in(api, &response);
    info!(role = %response.role, "Signed in");
    Ok(response)
}

/// Create an account and sign it in.
///
/// # Errors
///
/// Returns `ApiError` if the backend rejects the registration (for
/// example a taken username) or is unreachable.
#[instrument(skip(api, request), fields(username = %request.username.trim()))]
pub async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<LoginResponse, ApiError> {
    let response: LoginResponse = api
        .post_json("/api/auth/register", &request.normalized())
        .await?;
    sign_in(api, &response);
    info!(role = %response.role, "Registered and signed in");
    Ok(response)
}

/// Drop the token and any guest access.
pub fn logout(api: &ApiClient) {
    api.session().dispatch(SessionAction::SignedOut);
    api.session().dispatch(SessionAction::GuestLeft);
}

/// Grant anonymous catalog browsing.
pub fn enter_as_guest(api: &ApiClient) {
    api.session().dispatch(SessionAction::GuestEntered);
}

fn sign_in(api: &ApiClient, response: &LoginResponse) {
    api.session().dispatch(SessionAction::SignedIn {
        token: SecretString::from(response.token.clone()),
        role: response.role.clone(),
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use vetrina_core::Role;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&ClientConfig::for_url(&server.base_url()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_login_trims_username_and_signs_in() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/auth/login")
                    .json_body(json!({ "username": "anna", "password": " pw " }));
                then.status(200)
                    .json_body(json!({ "token": "a.b.c", "role": "USER" }));
            })
            .await;

        let api = client(&server);
        enter_as_guest(&api);
        let response = login(&api, "  anna ", " pw ").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.role, Role::User);
        let session = api.session().snapshot();
        assert!(session.can_shop());
        assert!(!session.is_guest());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_alone() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/login");
                then.status(400).json_body(json!({ "message": "Bad credentials" }));
            })
            .await;

        let api = client(&server);
        let err = login(&api, "anna", "wrong").await.unwrap_err();
        assert_eq!(err.user_message("Login failed"), "Bad credentials");
        assert!(!api.session().snapshot().is_logged_in());
    }

    #[tokio::test]
    async fn test_register_signs_in_admin_role() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/auth/register")
                    .json_body_partial(r#"{ "username": "marco", "city": "Roma" }"#);
                then.status(200)
                    .json_body(json!({ "token": "x.y.z", "role": "ADMIN" }));
            })
            .await;

        let api = client(&server);
        let request = RegisterRequest {
            username: " marco ".to_string(),
            password: "pw12".to_string(),
            city: "Roma ".to_string(),
            ..RegisterRequest::default()
        };
        register(&api, &request).await.unwrap();
        assert!(api.session().snapshot().is_admin());

        logout(&api);
        let session = api.session().snapshot();
        assert!(!session.is_logged_in());
        assert!(!session.is_guest());
    }
}
