//! Game catalog API client methods

use super::request::{ApiRequest, FilePart, MultipartForm};
use super::{ApiClient, ApiError};
use crate::types::{GameDetails, NewGame, SearchResults};
use serde::de::IgnoredAny;
use steamlite_core::{CategoryId, Game, GameId};

impl ApiClient {
    /// List the catalog, optionally narrowed to one category
    pub async fn list_games(&self, category: Option<CategoryId>) -> Result<Vec<Game>, ApiError> {
        let mut req = ApiRequest::get("/games");
        if let Some(category) = category {
            req = req.query("categoryId", category);
        }
        self.request(req).await
    }

    pub async fn get_game(&self, id: GameId) -> Result<Game, ApiError> {
        self.request(ApiRequest::get(format!("/games/{id}"))).await
    }

    /// Full-text search over names and descriptions
    pub async fn search_games(&self, query: &str) -> Result<SearchResults, ApiError> {
        self.request(ApiRequest::get("/games/search").query("q", query))
            .await
    }

    /// Game with reviews, related titles and statistics in one call
    pub async fn game_details(&self, id: GameId) -> Result<GameDetails, ApiError> {
        self.request(ApiRequest::get(format!("/games/{id}/details")))
            .await
    }

    pub async fn create_game(&self, game: &NewGame) -> Result<Game, ApiError> {
        let req = ApiRequest::post("/games").json(game)?;
        self.request(req).await
    }

    pub async fn update_game(&self, id: GameId, game: &NewGame) -> Result<Game, ApiError> {
        let req = ApiRequest::put(format!("/games/{id}")).json(game)?;
        self.request(req).await
    }

    pub async fn delete_game(&self, id: GameId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .request(ApiRequest::delete(format!("/games/{id}")))
            .await?;
        Ok(())
    }

    /// Replace a game's cover image
    pub async fn upload_game_image(&self, id: GameId, image: FilePart) -> Result<Game, ApiError> {
        let form = MultipartForm::new().file("image", image);
        self.request(ApiRequest::put(format!("/games/{id}/image")).multipart(form))
            .await
    }
}
