use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skeleton_core::KernelError;
use skeleton_core::Result;
use skeleton_core::drivers::Database;

use crate::models::{NewUser, User};

pub trait UserRepository: Send + Sync {
    fn create(&self, new_user: NewUser) -> Result<User>;

    fn find(&self, id: u64) -> Result<Option<User>>;

    /// One page of users (1-based `page`) and the total count.
    fn paginate(&self, page: usize, per_page: usize) -> Result<(Vec<User>, usize)>;

    /// Persist `user`. Returns `false` if it no longer exists.
    fn save(&self, user: &User) -> Result<bool>;

    fn delete(&self, id: u64) -> Result<bool>;

    fn count(&self) -> Result<usize>;
}

/// Stored form of a user; the id is the row key.
#[derive(Serialize, Deserialize)]
struct UserRow {
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub struct DatabaseUserRepository {
    db: Arc<dyn Database>,
}

impl DatabaseUserRepository {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    fn decode(id: u64, row: serde_json::Value) -> Result<User> {
        let row: UserRow = serde_json::from_value(row)?;
        Ok(row.into_user(id))
    }
}

impl UserRepository for DatabaseUserRepository {
    fn create(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now();
        let row = UserRow {
            name: new_user.name,
            email: new_user.email,
            created_at: now,
            updated_at: now,
        };
        let id = self.db.insert(User::TABLE, serde_json::to_value(&row)?)?;
        Ok(row.into_user(id))
    }

    fn find(&self, id: u64) -> Result<Option<User>> {
        self.db
            .get(User::TABLE, id)?
            .map(|row| Self::decode(id, row))
            .transpose()
    }

    fn paginate(&self, page: usize, per_page: usize) -> Result<(Vec<User>, usize)> {
        if page == 0 || per_page == 0 {
            return Err(KernelError::from("page and per_page start at 1"));
        }
        let total = self.db.count(User::TABLE)?;
        let users = self
            .db
            .list(User::TABLE, (page - 1) * per_page, per_page)?
            .into_iter()
            .map(|(id, row)| Self::decode(id, row))
            .collect::<Result<Vec<_>>>()?;
        Ok((users, total))
    }

    fn save(&self, user: &User) -> Result<bool> {
        let row = serde_json::to_value(UserRow::from(user))?;
        self.db.update(User::TABLE, user.id, row)
    }

    fn delete(&self, id: u64) -> Result<bool> {
        self.db.delete(User::TABLE, id)
    }

    fn count(&self) -> Result<usize> {
        self.db.count(User::TABLE)
    }
}
