use std::sync::Arc;

use skeleton_core::Result;
use skeleton_core::scheduler::Job;

use crate::repositories::UserRepository;

/// Logs the number of stored users every five minutes.
pub struct UserStatsJob {
    users: Arc<dyn UserRepository>,
}

impl UserStatsJob {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

impl Job for UserStatsJob {
    fn name(&self) -> &str {
        "user-stats"
    }

    fn schedule(&self) -> &str {
        "0 */5 * * * *"
    }

    fn handle(&self) -> Result<()> {
        let count = self.users.count()?;
        log::info!("User stats: {} user(s) stored", count);
        Ok(())
    }
}
