//! Per-client credential state
//!
//! The bearer credential and user record live in [`CredentialStorage`] so
//! they survive restarts. The anti-forgery token is memory only and is
//! replaced wholesale; concurrent refreshes resolve to whichever store
//! lands last.

use super::error::ApiError;
use super::storage::{CredentialStorage, MemoryStorage, StorageError, TOKEN_KEY, USER_KEY};
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use steamlite_core::User;
use tracing::{debug, warn};

pub struct Session {
    storage: Arc<dyn CredentialStorage>,
    anti_forgery_token: ArcSwapOption<String>,
    user: ArcSwapOption<User>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_anti_forgery_token", &self.anti_forgery_token.load().is_some())
            .field("user", &self.user.load().as_deref().map(|user| user.id))
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            storage,
            anti_forgery_token: ArcSwapOption::empty(),
            user: ArcSwapOption::empty(),
        }
    }

    /// Session backed by [`MemoryStorage`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn storage(&self) -> &Arc<dyn CredentialStorage> {
        &self.storage
    }

    /// Load the persisted user record into memory.
    ///
    /// A record that no longer parses is dropped from storage.
    pub async fn restore(&self) -> Result<Option<User>, ApiError> {
        if self.storage.get_item(TOKEN_KEY).await?.is_none() {
            return Ok(None);
        }

        let Some(raw) = self.storage.get_item(USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                debug!(user_id = user.id, "restored session");
                self.user.store(Some(Arc::new(user.clone())));
                Ok(Some(user))
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored user record");
                self.storage.remove_item(USER_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Current bearer credential, read from storage on every call
    pub async fn bearer_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get_item(TOKEN_KEY).await
    }

    /// Persist a fresh login.
    ///
    /// A new identity starts without an anti-forgery token.
    pub async fn establish(&self, token: &str, user: &User) -> Result<(), ApiError> {
        let record = serde_json::to_string(user)?;
        self.storage.set_item(TOKEN_KEY, token).await?;
        self.storage.set_item(USER_KEY, &record).await?;
        self.user.store(Some(Arc::new(user.clone())));
        self.clear_anti_forgery_token();
        Ok(())
    }

    /// Replace the stored user record, keeping the credential
    pub async fn update_user(&self, user: &User) -> Result<(), ApiError> {
        let record = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &record).await?;
        self.user.store(Some(Arc::new(user.clone())));
        Ok(())
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.user.load_full()
    }

    pub fn anti_forgery_token(&self) -> Option<String> {
        self.anti_forgery_token.load().as_deref().cloned()
    }

    pub fn set_anti_forgery_token(&self, token: impl Into<String>) {
        self.anti_forgery_token.store(Some(Arc::new(token.into())));
    }

    pub fn clear_anti_forgery_token(&self) {
        self.anti_forgery_token.store(None);
    }

    /// Forget every credential.
    ///
    /// Memory is cleared before storage, so the in-memory state is empty
    /// even when storage fails. Safe to call repeatedly.
    pub async fn terminate(&self) -> Result<(), StorageError> {
        self.user.store(None);
        self.clear_anti_forgery_token();

        let token = self.storage.remove_item(TOKEN_KEY).await;
        let user = self.storage.remove_item(USER_KEY).await;
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::mock::MockCredentialStorage;
    use mockall::predicate::eq;
    use steamlite_core::Role;

    fn user() -> User {
        User {
            id: 3,
            name: "ana".to_string(),
            email: Some("ana@example.com".to_string()),
            role: Role::User,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_establish_persists_and_clears_anti_forgery() {
        let session = Session::in_memory();
        session.set_anti_forgery_token("stale");

        session.establish("t1", &user()).await.unwrap();

        assert_eq!(session.bearer_token().await.unwrap().as_deref(), Some("t1"));
        assert_eq!(session.current_user().unwrap().id, 3);
        assert_eq!(session.anti_forgery_token(), None);
    }

    #[tokio::test]
    async fn test_restore_reads_persisted_user() {
        let storage: Arc<dyn CredentialStorage> = Arc::new(MemoryStorage::new());
        Session::new(storage.clone())
            .establish("t1", &user())
            .await
            .unwrap();

        let reopened = Session::new(storage);
        assert!(reopened.current_user().is_none());
        let restored = reopened.restore().await.unwrap();
        assert_eq!(restored, Some(user()));
        assert_eq!(reopened.current_user().unwrap().name, "ana");
    }

    #[tokio::test]
    async fn test_restore_without_token_is_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .await
            .unwrap();

        let session = Session::new(storage);
        assert_eq!(session.restore().await.unwrap(), None);
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_restore_drops_corrupt_record() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(TOKEN_KEY, "t1").await.unwrap();
        storage.set_item(USER_KEY, "not json").await.unwrap();

        let session = Session::new(storage.clone());
        assert_eq!(session.restore().await.unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_terminate_is_idempotent() {
        let session = Session::in_memory();
        session.establish("t1", &user()).await.unwrap();
        session.set_anti_forgery_token("abc");

        session.terminate().await.unwrap();
        session.terminate().await.unwrap();

        assert_eq!(session.bearer_token().await.unwrap(), None);
        assert!(session.current_user().is_none());
        assert_eq!(session.anti_forgery_token(), None);
    }

    #[tokio::test]
    async fn test_terminate_clears_memory_when_storage_fails() {
        let mut storage = MockCredentialStorage::new();
        storage
            .expect_remove_item()
            .with(eq(TOKEN_KEY))
            .times(1)
            .returning(|_| Err(StorageError::Backend("disk full".to_string())));
        storage
            .expect_remove_item()
            .with(eq(USER_KEY))
            .times(1)
            .returning(|_| Ok(()));
        storage.expect_set_item().returning(|_, _| Ok(()));

        let session = Session::new(Arc::new(storage));
        session.establish("t1", &user()).await.unwrap();
        session.set_anti_forgery_token("abc");

        let result = session.terminate().await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
        assert!(session.current_user().is_none());
        assert_eq!(session.anti_forgery_token(), None);
    }

    #[test]
    fn test_anti_forgery_last_write_wins() {
        let session = Session::in_memory();
        session.set_anti_forgery_token("first");
        session.set_anti_forgery_token("second");
        assert_eq!(session.anti_forgery_token().as_deref(), Some("second"));
    }
}
