use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::accounts::{
    repo::{StoreError, UniqueField, UserStore},
    repo_types::{NewUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    rows: BTreeMap<i64, User>,
    by_email: HashMap<String, i64>,
    by_username: HashMap<String, i64>,
}

/// Process-local [`UserStore`] with the same uniqueness rules as the `users` table.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    tables: RwLock<Tables>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.by_email.get(email).and_then(|id| t.rows.get(id)).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // Check and insert under one write guard so racing inserts serialize.
        let mut t = self.tables.write().await;
        if t.by_email.contains_key(&user.email) {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }
        if t.by_username.contains_key(&user.username) {
            return Err(StoreError::UniqueViolation(UniqueField::Username));
        }

        t.next_id += 1;
        let row = User {
            id: t.next_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.by_email.insert(row.email.clone(), row.id);
        t.by_username.insert(row.username.clone(), row.id);
        t.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "digest".into(),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let store = InMemoryUserStore::new();
        let a = store.insert(new_user("alice", "alice@x.com")).await.unwrap();
        let b = store.insert(new_user("bob", "bob@x.com")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn find_by_email() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("alice", "alice@x.com")).await.unwrap();

        let found = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_email_and_username() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("alice", "alice@x.com")).await.unwrap();

        let err = store.insert(new_user("alice2", "alice@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(UniqueField::Email)));

        let err = store.insert(new_user("alice", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(UniqueField::Username)));

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = InMemoryUserStore::new();
        for i in 0..5 {
            store
                .insert(new_user(&format!("u{i}"), &format!("u{i}@x.com")))
                .await
                .unwrap();
        }
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
