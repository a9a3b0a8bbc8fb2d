//! Authentication API client methods

use super::request::{ApiRequest, MultipartForm};
use super::{ApiClient, ApiError};
use crate::types::{LoginRequest, LoginResponse, RegisterForm};
use steamlite_core::{Role, User};
use tracing::info;

impl ApiClient {
    /// Sign in and persist the returned credential and user record
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let req = ApiRequest::post("/login").json(&LoginRequest { email, password })?;
        let LoginResponse { token, user } = self.request(req).await?;

        self.session.establish(&token, &user).await?;
        info!(user_id = user.id, role = user.role.as_str(), "signed in");
        Ok(user)
    }

    /// Sign out locally; the backend keeps no session to end
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.terminate().await?;
        info!("signed out");
        Ok(())
    }

    /// Create a customer account
    pub async fn register(&self, form: RegisterForm) -> Result<User, ApiError> {
        let mut multipart = MultipartForm::new()
            .text("username", form.username)
            .text("email", form.email)
            .text("password", form.password)
            .text("role", Role::User.as_str());
        if let Some(avatar) = form.avatar {
            multipart = multipart.file("avatar", avatar);
        }

        let user: User = self
            .request(ApiRequest::post("/users").multipart(multipart))
            .await?;
        info!(user_id = user.id, "registered account");
        Ok(user)
    }

    /// Reload the persisted user record, e.g. after a restart
    pub async fn restore_session(&self) -> Result<Option<User>, ApiError> {
        self.session.restore().await
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user().map(|user| (*user).clone())
    }

    /// Whether a bearer credential is stored
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.session.bearer_token().await?.is_some())
    }

    pub(crate) fn require_user(&self) -> Result<std::sync::Arc<User>, ApiError> {
        self.session.current_user().ok_or(ApiError::NotSignedIn)
    }
}
