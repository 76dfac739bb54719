use chrono::Utc;
use skeleton_core::Result;
use skeleton_core::scheduler::Job;

/// Logs a heartbeat every minute.
pub struct ExampleJob {
    app_name: String,
}

impl ExampleJob {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }
}

impl Job for ExampleJob {
    fn name(&self) -> &str {
        "example-job"
    }

    fn schedule(&self) -> &str {
        "0 * * * * *"
    }

    fn handle(&self) -> Result<()> {
        log::info!(
            "Example scheduled job executed for {} at {}",
            self.app_name,
            Utc::now().to_rfc3339()
        );
        Ok(())
    }
}
