use std::sync::Mutex;

use async_trait::async_trait;

use crate::kernel::component::Lifecycle;
use crate::kernel::error::{Error, Result};
use crate::registry::Named;
use crate::scheduler::{JobHandler, JobRegistry, ScheduledJob, Scheduler};

/// Records every `schedule` call; rejects the job named in `fail_on`.
#[derive(Default)]
struct RecordingScheduler {
    calls: Mutex<Vec<(String, String)>>,
    fail_on: Option<&'static str>,
}

impl RecordingScheduler {
    fn failing_on(name: &'static str) -> Self {
        Self {
            fail_on: Some(name),
            ..Default::default()
        }
    }

    fn call_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }
}

#[async_trait]
impl Lifecycle for RecordingScheduler {
    fn name(&self) -> &str {
        "recording-scheduler"
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn schedule(&self, cron: &str, name: &str, _handler: JobHandler) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((cron.to_string(), name.to_string()));
        if self.fail_on == Some(name) {
            return Err(Error::Scheduler("rejected".to_string()));
        }
        Ok(())
    }
}

fn job(name: &str, enabled: bool) -> ScheduledJob {
    ScheduledJob::new(name, "0 * * * * *", || Ok(())).with_enabled(enabled)
}

fn registry(jobs: &[(&str, bool)]) -> JobRegistry {
    let mut registry = JobRegistry::jobs();
    for (name, enabled) in jobs {
        registry.register(Box::new(job(name, *enabled)));
    }
    registry
}

#[test]
fn test_enabled_jobs_preserve_order() {
    let registry = registry(&[("A", true), ("B", false), ("C", true)]);

    let enabled: Vec<&str> = registry.enabled_jobs().into_iter().map(|j| j.name()).collect();
    assert_eq!(enabled, vec!["A", "C"]);
    assert_eq!(registry.names(), vec!["A", "B", "C"]);
    assert_eq!(registry.label(), "job");
}

#[tokio::test]
async fn test_schedule_all_only_schedules_enabled_jobs_in_order() {
    let registry = registry(&[("A", true), ("B", false), ("C", true)]);
    let scheduler = RecordingScheduler::default();

    let scheduled = registry.schedule_all(&scheduler).await.unwrap();

    assert_eq!(scheduled, 2);
    assert_eq!(scheduler.call_names(), vec!["A", "C"]);
    assert_eq!(scheduler.calls.lock().unwrap()[0].0, "0 * * * * *");
}

#[tokio::test]
async fn test_schedule_all_stops_at_first_failure_without_rollback() {
    let registry = registry(&[("A", true), ("B", true), ("C", true), ("D", true)]);
    let scheduler = RecordingScheduler::failing_on("C");

    let err = registry.schedule_all(&scheduler).await.unwrap_err();

    match &err {
        Error::JobScheduling { job, source } => {
            assert_eq!(job, "C");
            assert!(matches!(**source, Error::Scheduler(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("'C'"));
    // A and B were handed over before the failure, D never was.
    assert_eq!(scheduler.call_names(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_schedule_all_with_nothing_enabled() {
    let registry = registry(&[("A", false)]);
    let scheduler = RecordingScheduler::default();

    assert_eq!(registry.schedule_all(&scheduler).await.unwrap(), 0);
    assert!(scheduler.call_names().is_empty());
}
