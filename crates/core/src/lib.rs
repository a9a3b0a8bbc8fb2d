//! SteamLite core types and utilities

pub mod config;
pub mod error;
#[cfg(feature = "tracing")]
pub mod tracing;
pub mod types;

pub use config::{AntiForgeryConfig, ClientConfig, StorageConfig};
pub use error::{CoreError, CoreResult};
pub use types::{Category, CategoryId, Game, GameId, Review, Role, User, UserId};
