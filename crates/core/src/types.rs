use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type GameId = i64;
pub type CategoryId = i64;

/// Account role as reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
    #[default]
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Developer => "developer",
            Self::User => "user",
            Self::Unknown => "unknown",
        }
    }
}

/// User identity record, also persisted alongside the bearer credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(alias = "username")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins edit everything; developers only edit games they published
    pub fn can_edit_game(&self, game: &Game) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Developer => game.developer_id == Some(self.id),
            Role::User | Role::Unknown => false,
        }
    }

    /// Only regular customer accounts buy and return games
    pub fn can_purchase(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: UserId,
    pub game_id: GameId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn developer(id: UserId) -> User {
        User {
            id,
            name: "dev".to_string(),
            email: None,
            role: Role::Developer,
            avatar: None,
        }
    }

    fn game(developer_id: Option<UserId>) -> Game {
        Game {
            id: 7,
            name: "Portal".to_string(),
            description: String::new(),
            price: 9.99,
            image: None,
            category_id: Some(1),
            developer_id,
        }
    }

    #[test]
    fn test_developer_edits_only_own_games() {
        let dev = developer(3);
        assert!(dev.can_edit_game(&game(Some(3))));
        assert!(!dev.can_edit_game(&game(Some(4))));
        assert!(!dev.can_edit_game(&game(None)));
    }

    #[test]
    fn test_admin_edits_any_game_but_cannot_purchase() {
        let admin = User {
            role: Role::Admin,
            ..developer(1)
        };
        assert!(admin.can_edit_game(&game(Some(99))));
        assert!(!admin.can_purchase());
    }

    #[test]
    fn test_user_accepts_backend_field_variants() {
        let user: User = serde_json::from_value(json!({
            "id": 12,
            "username": "gabe",
            "role": "user"
        }))
        .unwrap();
        assert_eq!(user.name, "gabe");
        assert!(user.can_purchase());

        let unknown: User = serde_json::from_value(json!({
            "id": 13,
            "name": "mod",
            "role": "moderator"
        }))
        .unwrap();
        assert_eq!(unknown.role, Role::Unknown);
    }

    #[test]
    fn test_game_accepts_title_alias() {
        let game: Game = serde_json::from_value(json!({
            "id": 1,
            "title": "Half-Life",
            "price": 4.99,
            "categoryId": 2,
            "developerId": 5
        }))
        .unwrap();
        assert_eq!(game.name, "Half-Life");
        assert_eq!(game.category_id, Some(2));
        assert_eq!(game.developer_id, Some(5));
        assert!(game.description.is_empty());
    }
}
