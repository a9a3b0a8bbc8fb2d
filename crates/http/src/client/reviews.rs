//! Review API client methods

use super::request::ApiRequest;
use super::{ApiClient, ApiError};
use crate::types::NewReview;
use steamlite_core::{GameId, Review};

const MAX_RATING: u8 = 5;

impl ApiClient {
    pub async fn list_reviews(&self, game: GameId) -> Result<Vec<Review>, ApiError> {
        self.request(ApiRequest::get("/reviews").query("gameId", game))
            .await
    }

    /// Post a review as the signed-in user
    pub async fn create_review(
        &self,
        game: GameId,
        rating: u8,
        comment: &str,
    ) -> Result<Review, ApiError> {
        if !(1..=MAX_RATING).contains(&rating) {
            return Err(ApiError::Validation {
                message: format!("rating must be between 1 and {MAX_RATING}"),
                fields: [("rating".to_string(), format!("expected 1-{MAX_RATING}, got {rating}"))]
                    .into_iter()
                    .collect(),
            });
        }

        let user = self.require_user()?;
        let req = ApiRequest::post("/reviews").json(&NewReview {
            user_id: user.id,
            game_id: game,
            rating,
            comment,
        })?;
        self.request(req).await
    }
}
