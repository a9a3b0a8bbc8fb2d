//! Request and response bodies of the SteamLite API

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use steamlite_core::{CategoryId, Game, GameId, Review, Role, User, UserId};

use crate::client::request::FilePart;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Account creation, sent as multipart so an avatar can ride along
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<FilePart>,
}

/// Partial profile update; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryName<'a> {
    pub name: &'a str,
}

/// Game creation and update body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Publishing account; developers own the games they create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewReview<'a> {
    pub user_id: UserId,
    pub game_id: GameId,
    pub rating: u8,
    pub comment: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OwnershipRequest {
    pub game_id: GameId,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Game>,
    #[serde(default)]
    pub total_found: u64,
    #[serde(default)]
    pub search_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetails {
    pub game: Game,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub related_games: Vec<Game>,
    #[serde(default)]
    pub statistics: JsonValue,
    #[serde(default)]
    pub fetch_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDetailed {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub statistics: JsonValue,
    #[serde(default)]
    pub calculation_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkPriceAction {
    /// Dry run: report what would change
    Validate,
    UpdatePrices,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkPriceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub action: BulkPriceAction,
    /// Percentage change, e.g. `-10.0` for a ten percent discount
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateReport {
    pub total_games: u64,
    pub successful: u64,
    pub failed: u64,
    #[serde(default)]
    pub processing_time: Option<String>,
    #[serde(default)]
    pub results: Vec<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_games: u64,
    pub valid_games: u64,
    pub invalid_games: u64,
    #[serde(default)]
    pub invalid_details: Vec<JsonValue>,
    #[serde(default)]
    pub validation_time: Option<String>,
}

/// Result of a release notification fan-out; shape is backend defined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationReport {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, JsonValue>,
}

/// Result of server-side image processing; shape is backend defined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageProcessingReport {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, JsonValue>,
}
