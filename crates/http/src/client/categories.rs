//! Category API client methods

use super::request::ApiRequest;
use super::{ApiClient, ApiError};
use crate::types::CategoryName;
use serde::de::IgnoredAny;
use steamlite_core::{Category, CategoryId};

impl ApiClient {
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.request(ApiRequest::get("/categories")).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        let req = ApiRequest::post("/categories").json(&CategoryName { name })?;
        self.request(req).await
    }

    pub async fn rename_category(&self, id: CategoryId, name: &str) -> Result<Category, ApiError> {
        let req = ApiRequest::put(format!("/categories/{id}")).json(&CategoryName { name })?;
        self.request(req).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .request(ApiRequest::delete(format!("/categories/{id}")))
            .await?;
        Ok(())
    }
}
