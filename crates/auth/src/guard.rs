//! Authentication status provider backed by the persisted marker.

use crate::storage::{LocalStorage, StorageError};

/// Storage key of the authentication marker.
pub const AUTH_MARKER_KEY: &str = "isAuthenticated";

/// Value written on sign-in.
pub const AUTH_MARKER_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// The marker has not been read yet.
    Resolving,
    Authenticated,
    Anonymous,
}

/// Resolves and mutates the authentication marker.
#[derive(Debug, Clone)]
pub struct AuthGuard<S> {
    storage: S,
    status: AuthStatus,
}

impl<S: LocalStorage> AuthGuard<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            status: AuthStatus::Resolving,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn is_resolving(&self) -> bool {
        self.status == AuthStatus::Resolving
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the marker and settle the status.
    ///
    /// An unreadable marker counts as signed out.
    pub async fn resolve(&mut self) -> AuthStatus {
        self.status = match self.storage.get_item(AUTH_MARKER_KEY).await {
            Ok(Some(value)) if value == AUTH_MARKER_VALUE => AuthStatus::Authenticated,
            Ok(_) => AuthStatus::Anonymous,
            Err(err) => {
                tracing::error!("failed to read auth marker: {err:?}");
                AuthStatus::Anonymous
            }
        };
        tracing::debug!("auth status resolved: {:?}", self.status);
        self.status
    }

    pub async fn sign_in(&mut self) -> Result<(), StorageError> {
        self.storage
            .set_item(AUTH_MARKER_KEY, AUTH_MARKER_VALUE)
            .await?;
        self.status = AuthStatus::Authenticated;
        tracing::info!("signed in");
        Ok(())
    }

    /// Remove the marker. On failure the status is left unchanged.
    pub async fn sign_out(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(AUTH_MARKER_KEY).await?;
        self.status = AuthStatus::Anonymous;
        tracing::info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn starts_resolving() {
        let guard = AuthGuard::new(MemoryStorage::new());
        assert!(guard.is_resolving());
        assert!(!guard.is_authenticated());
    }

    #[tokio::test]
    async fn marker_resolves_to_authenticated() {
        let storage = MemoryStorage::with_items([(AUTH_MARKER_KEY, AUTH_MARKER_VALUE)]);
        let mut guard = AuthGuard::new(storage);
        assert_eq!(guard.resolve().await, AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn missing_or_unexpected_marker_is_anonymous() {
        let mut guard = AuthGuard::new(MemoryStorage::new());
        assert_eq!(guard.resolve().await, AuthStatus::Anonymous);

        let storage = MemoryStorage::with_items([(AUTH_MARKER_KEY, "yes")]);
        let mut guard = AuthGuard::new(storage);
        assert_eq!(guard.resolve().await, AuthStatus::Anonymous);
    }

    #[tokio::test]
    async fn sign_in_then_out_updates_marker_and_status() {
        let storage = MemoryStorage::new();
        let mut guard = AuthGuard::new(storage.clone());

        guard.sign_in().await.unwrap();
        assert!(guard.is_authenticated());
        assert_eq!(
            storage.get_item(AUTH_MARKER_KEY).await.unwrap().as_deref(),
            Some(AUTH_MARKER_VALUE)
        );

        guard.sign_out().await.unwrap();
        assert_eq!(guard.status(), AuthStatus::Anonymous);
        assert_eq!(storage.get_item(AUTH_MARKER_KEY).await.unwrap(), None);
    }
}
