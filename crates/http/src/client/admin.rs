//! Admin tooling API client methods

use super::request::ApiRequest;
use super::{ApiClient, ApiError};
use crate::types::{
    BulkPriceUpdate, BulkUpdateReport, DashboardStats, ImageProcessingReport, NotificationReport,
    ValidationReport,
};
use steamlite_core::GameId;

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.request(ApiRequest::get("/admin/dashboard/stats"))
            .await
    }

    /// Validate or apply a percentage price change across the catalog
    pub async fn bulk_update_prices(
        &self,
        update: &BulkPriceUpdate,
    ) -> Result<BulkUpdateReport, ApiError> {
        let req = ApiRequest::post("/admin/games/bulk-update-prices").json(update)?;
        self.request(req).await
    }

    pub async fn validate_all_games(&self) -> Result<ValidationReport, ApiError> {
        self.request(ApiRequest::post("/admin/games/validate-all"))
            .await
    }

    pub async fn notify_game_release(&self, game: GameId) -> Result<NotificationReport, ApiError> {
        self.request(ApiRequest::post(format!("/games/{game}/notify")))
            .await
    }

    pub async fn process_game_images(
        &self,
        game: GameId,
    ) -> Result<ImageProcessingReport, ApiError> {
        self.request(ApiRequest::post(format!("/games/{game}/process-images")))
            .await
    }
}
