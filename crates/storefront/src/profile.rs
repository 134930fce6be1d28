//! Profile and password management.

use tracing::{info, instrument};
use vetrina_client::{ApiError, StatusCode, auth};
use vetrina_core::{ChangePasswordRequest, MessageResponse, Profile, UpdateProfileRequest};

use crate::client::StorefrontClient;
use crate::error::PasswordError;

/// Minimum length of a new password.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Shown after a password change when the backend sends no message.
pub const PASSWORD_CHANGED_MESSAGE: &str = "Password updated. Please sign in again.";

impl StorefrontClient {
    /// The signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (401 when not signed in).
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.api().get_json("/api/me/profile").await
    }

    /// Update contact details. Values are trimmed before sending.
    ///
    /// # Errors
    ///
    /// Returns `ApiError`; a 409 means the email is taken, see
    /// [`profile_error_message`].
    #[instrument(skip(self, request))]
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<Profile, ApiError> {
        let profile: Profile = self
            .api()
            .put_json("/api/me/profile", &request.normalized())
            .await?;
        info!(username = %profile.username, "Profile updated");
        Ok(profile)
    }

    /// Change the password after local checks, then sign out.
    ///
    /// Returns the message to show on the sign-in screen.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` when a field is missing, the new password is
    /// shorter than [`MIN_PASSWORD_LEN`], the confirmation differs, or the
    /// backend refuses (for example a wrong current password). The session
    /// is kept in every error case.
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<String, PasswordError> {
        validate_password_change(request)?;

        let response: MessageResponse = self.api().post_json("/api/me/password", request).await?;

        auth::logout(self.api());
        info!("Password changed; signed out");
        Ok(response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| PASSWORD_CHANGED_MESSAGE.to_string()))
    }
}

/// Local checks run before a password change is sent.
///
/// # Errors
///
/// Returns the first failing check.
pub fn validate_password_change(request: &ChangePasswordRequest) -> Result<(), PasswordError> {
    if request.current_password.is_empty()
        || request.new_password.is_empty()
        || request.confirm_new_password.is_empty()
    {
        return Err(PasswordError::MissingField);
    }
    if request.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LEN));
    }
    if request.new_password != request.confirm_new_password {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

/// User-facing message for a failed profile load or update.
#[must_use]
pub fn profile_error_message(err: &ApiError) -> String {
    if err.status() == Some(StatusCode::CONFLICT) {
        err.user_message("Email already in use")
    } else {
        err.user_message("Failed to save profile")
    }
}
