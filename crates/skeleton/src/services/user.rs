use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use skeleton_core::Result;
use skeleton_core::drivers::{CacheExt, CacheStore, Queue};

use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;

/// Queue job dispatched for every new user.
pub const WELCOME_EMAIL_JOB: &str = "send-welcome-email";

const USER_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

fn cache_key(id: u64) -> String {
    format!("user:{id}")
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

pub trait UserService: Send + Sync {
    /// Store the user and queue its welcome email.
    fn create(&self, new_user: NewUser) -> Result<User>;

    fn get(&self, id: u64) -> Result<Option<User>>;

    fn list(&self, page: usize, per_page: usize) -> Result<UserPage>;

    /// `None` if the user does not exist.
    fn update(&self, id: u64, changes: UpdateUser) -> Result<Option<User>>;

    fn delete(&self, id: u64) -> Result<bool>;
}

pub struct DefaultUserService {
    repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheStore>,
    queue: Arc<dyn Queue>,
}

impl DefaultUserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheStore>,
        queue: Arc<dyn Queue>,
    ) -> Self {
        Self {
            repository,
            cache,
            queue,
        }
    }
}

impl UserService for DefaultUserService {
    fn create(&self, new_user: NewUser) -> Result<User> {
        let user = self.repository.create(new_user)?;
        self.queue.dispatch(
            WELCOME_EMAIL_JOB,
            json!({ "user_id": user.id, "email": user.email }),
        )?;
        log::info!("User {} created", user.id);
        Ok(user)
    }

    fn get(&self, id: u64) -> Result<Option<User>> {
        let key = cache_key(id);
        if let Some(user) = self.cache.get_as::<User>(&key) {
            log::trace!("Cache hit for {}", key);
            return Ok(Some(user));
        }

        let user = self.repository.find(id)?;
        if let Some(user) = &user {
            if let Err(e) = self.cache.put_as(&key, user, Some(USER_CACHE_TTL)) {
                log::warn!("Could not cache {}: {}", key, e);
            }
        }
        Ok(user)
    }

    fn list(&self, page: usize, per_page: usize) -> Result<UserPage> {
        let (users, total) = self.repository.paginate(page, per_page)?;
        Ok(UserPage {
            users,
            total,
            page,
            per_page,
        })
    }

    fn update(&self, id: u64, changes: UpdateUser) -> Result<Option<User>> {
        let Some(mut user) = self.repository.find(id)? else {
            return Ok(None);
        };
        user.apply(changes);
        if !self.repository.save(&user)? {
            return Ok(None);
        }
        self.cache.forget(&cache_key(id));
        Ok(Some(user))
    }

    fn delete(&self, id: u64) -> Result<bool> {
        let deleted = self.repository.delete(id)?;
        self.cache.forget(&cache_key(id));
        Ok(deleted)
    }
}
