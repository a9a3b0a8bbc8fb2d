//! HTTP client for the SteamLite storefront API
//!
//! [`ApiClient`] owns the credential lifecycle: the bearer credential is
//! persisted through [`CredentialStorage`], the anti-forgery token is kept
//! in memory and refreshed on rejection, and a 401 clears both.

pub mod client;
pub mod types;

pub use client::error::ApiError;
pub use client::pages::{AdminOverview, GamePage, PartialGamePage};
pub use client::request::{ApiRequest, FilePart, MultipartForm, RequestBody};
pub use client::session::Session;
#[cfg(not(target_arch = "wasm32"))]
pub use client::storage::FileStorage;
pub use client::storage::{CredentialStorage, MemoryStorage, StorageError};
pub use client::{ApiClient, ApiClientBuilder, AuthExpiredHook};
