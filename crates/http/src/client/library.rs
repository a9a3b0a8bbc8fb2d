//! Ownership (library) API client methods

use super::request::ApiRequest;
use super::{ApiClient, ApiError};
use crate::types::{LibraryDetailed, OwnershipRequest};
use serde::de::IgnoredAny;
use steamlite_core::{Game, GameId};
use tracing::info;

impl ApiClient {
    /// Games owned by the signed-in user
    pub async fn library(&self) -> Result<Vec<Game>, ApiError> {
        self.request(ApiRequest::get("/library")).await
    }

    pub async fn library_detailed(&self) -> Result<LibraryDetailed, ApiError> {
        self.request(ApiRequest::get("/library/detailed")).await
    }

    pub async fn owns_game(&self, game: GameId) -> Result<bool, ApiError> {
        Ok(self.library().await?.iter().any(|owned| owned.id == game))
    }

    pub async fn purchase_game(&self, game: GameId) -> Result<(), ApiError> {
        let req = ApiRequest::post("/ownership").json(&OwnershipRequest {
            game_id: game,
            status: "owned",
        })?;
        let _: IgnoredAny = self.request(req).await?;
        info!(game_id = game, "purchased game");
        Ok(())
    }

    pub async fn return_game(&self, game: GameId) -> Result<(), ApiError> {
        let req = ApiRequest::delete("/ownership").query("gameId", game);
        let _: IgnoredAny = self.request(req).await?;
        info!(game_id = game, "returned game");
        Ok(())
    }
}
