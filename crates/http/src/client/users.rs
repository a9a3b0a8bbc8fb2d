//! User management API client methods

use super::request::{ApiRequest, FilePart, MultipartForm};
use super::{ApiClient, ApiError};
use crate::types::UserUpdate;
use serde::de::IgnoredAny;
use steamlite_core::{User, UserId};

impl ApiClient {
    /// List all accounts (admin)
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.request(ApiRequest::get("/users")).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.request(ApiRequest::get(format!("/users/{id}"))).await
    }

    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let req = ApiRequest::put(format!("/users/{id}")).json(update)?;
        let user: User = self.request(req).await?;
        self.refresh_own_record(&user).await?;
        Ok(user)
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .request(ApiRequest::delete(format!("/users/{id}")))
            .await?;
        Ok(())
    }

    /// Replace a user's avatar image
    pub async fn upload_avatar(&self, id: UserId, avatar: FilePart) -> Result<User, ApiError> {
        let form = MultipartForm::new().file("avatar", avatar);
        let req = ApiRequest::put(format!("/users/{id}/avatar")).multipart(form);
        let user: User = self.request(req).await?;
        self.refresh_own_record(&user).await?;
        Ok(user)
    }

    async fn refresh_own_record(&self, user: &User) -> Result<(), ApiError> {
        match self.session.current_user() {
            Some(current) if current.id == user.id => self.session.update_user(user).await,
            _ => Ok(()),
        }
    }
}
