//! Fan-out loaders for screens that need several independent resources
//!
//! Requests are joined concurrently. The strict loaders fail as soon as any
//! part fails; [`ApiClient::load_game_page_partial`] reports each part on
//! its own so a screen can render what it has.

use super::{ApiClient, ApiError};
use serde::Serialize;
use steamlite_core::{Category, Game, GameId, Review, User};

#[derive(Debug, Clone, Serialize)]
pub struct GamePage {
    pub game: Game,
    pub reviews: Vec<Review>,
    /// `None` when nobody is signed in
    pub owned: Option<bool>,
}

#[derive(Debug)]
pub struct PartialGamePage {
    pub game: Result<Game, ApiError>,
    pub reviews: Result<Vec<Review>, ApiError>,
    /// `None` when nobody is signed in
    pub library: Option<Result<Vec<Game>, ApiError>>,
}

impl PartialGamePage {
    /// Ownership of `game`, when the library loaded
    pub fn owned(&self, game: GameId) -> Option<bool> {
        match &self.library {
            Some(Ok(games)) => Some(games.iter().any(|owned| owned.id == game)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub games: Vec<Game>,
}

impl ApiClient {
    /// Game, its reviews and, when signed in, whether the user owns it
    pub async fn load_game_page(&self, id: GameId) -> Result<GamePage, ApiError> {
        let signed_in = self.session.current_user().is_some();
        let library = async {
            if signed_in {
                self.library().await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (game, reviews, library) =
            tokio::try_join!(self.get_game(id), self.list_reviews(id), library)?;

        Ok(GamePage {
            game,
            reviews,
            owned: library.map(|games| games.iter().any(|owned| owned.id == id)),
        })
    }

    pub async fn load_game_page_partial(&self, id: GameId) -> PartialGamePage {
        let signed_in = self.session.current_user().is_some();
        let library = async {
            if signed_in {
                Some(self.library().await)
            } else {
                None
            }
        };

        let (game, reviews, library) =
            tokio::join!(self.get_game(id), self.list_reviews(id), library);

        PartialGamePage {
            game,
            reviews,
            library,
        }
    }

    /// Users, categories and the full catalog for the admin dashboard
    pub async fn load_admin_overview(&self) -> Result<AdminOverview, ApiError> {
        let (users, categories, games) = tokio::try_join!(
            self.list_users(),
            self.list_categories(),
            self.list_games(None)
        )?;

        Ok(AdminOverview {
            users,
            categories,
            games,
        })
    }
}
