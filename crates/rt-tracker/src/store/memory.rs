//! In-process flag store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::FlagStore;
use crate::error::StoreResult;
use crate::user::UserId;

type Flags = BTreeMap<(String, String), Value>;

/// Flags held in memory, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    users: RwLock<HashMap<UserId, Flags>>,
}

impl MemoryFlagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn get_flag(&self, user: &UserId, scope: &str, key: &str) -> StoreResult<Option<Value>> {
        let users = self.users.read().await;
        Ok(users
            .get(user)
            .and_then(|flags| flags.get(&(scope.to_string(), key.to_string())))
            .cloned())
    }

    async fn set_flag(
        &self,
        user: &UserId,
        scope: &str,
        key: &str,
        value: Value,
    ) -> StoreResult<()> {
        let mut users = self.users.write().await;
        users
            .entry(user.clone())
            .or_default()
            .insert((scope.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn unset_flag(&self, user: &UserId, scope: &str, key: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(flags) = users.get_mut(user) {
            flags.remove(&(scope.to_string(), key.to_string()));
            if flags.is_empty() {
                users.remove(user);
            }
        }
        Ok(())
    }

    async fn users(&self) -> StoreResult<Vec<UserId>> {
        let users = self.users.read().await;
        let mut ids: Vec<UserId> = users.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_get_unset() {
        let store = MemoryFlagStore::new();
        let user = UserId::new("alice");
        assert_eq!(store.get_flag(&user, "s", "k").await.unwrap(), None);

        store.set_flag(&user, "s", "k", json!(1)).await.unwrap();
        store.set_flag(&user, "s", "k", json!(2)).await.unwrap();
        assert_eq!(store.get_flag(&user, "s", "k").await.unwrap(), Some(json!(2)));

        store.unset_flag(&user, "s", "k").await.unwrap();
        assert_eq!(store.get_flag(&user, "s", "k").await.unwrap(), None);
        assert!(store.users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scopes_are_separate() {
        let store = MemoryFlagStore::new();
        let user = UserId::new("alice");
        store.set_flag(&user, "a", "k", json!("a")).await.unwrap();
        store.set_flag(&user, "b", "k", json!("b")).await.unwrap();
        assert_eq!(store.get_flag(&user, "a", "k").await.unwrap(), Some(json!("a")));
        assert_eq!(store.get_flag(&user, "b", "k").await.unwrap(), Some(json!("b")));
    }

    #[tokio::test]
    async fn unset_missing_is_ok() {
        let store = MemoryFlagStore::new();
        store
            .unset_flag(&UserId::new("nobody"), "s", "k")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn users_sorted() {
        let store = MemoryFlagStore::new();
        for name in ["carol", "alice", "bob"] {
            store
                .set_flag(&UserId::new(name), "s", "k", json!(null))
                .await
                .unwrap();
        }
        let users: Vec<String> = store
            .users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(users, vec!["alice", "bob", "carol"]);
    }
}
