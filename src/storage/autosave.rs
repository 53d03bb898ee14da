//! Periodic persistence of the shared journal

use super::gateway::StorageGateway;
use crate::managers::Journal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Snapshot `journal` into `gateway` every `interval`, unconditionally.
///
/// The first save happens one interval after spawning. Abort the returned
/// handle to stop.
pub fn spawn_autosave(
    journal: Arc<RwLock<Journal>>,
    gateway: Arc<StorageGateway>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let document = journal.read().await.to_document();
            gateway.save_async(&document).await;
            tracing::debug!("Autosaved {}", gateway.path().display());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::NewTask;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_autosave_persists_mutations() {
        let dir = TempDir::new().unwrap();
        let gateway = Arc::new(StorageGateway::new(dir.path().join("data.json")));
        let journal = Arc::new(RwLock::new(Journal::empty()));

        let handle = spawn_autosave(journal.clone(), gateway.clone(), Duration::from_millis(20));

        journal.write().await.tasks.add_task(NewTask {
            subject: "Music".to_string(),
            description: "Practice scales".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            priority: Default::default(),
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        let doc = gateway.load();
        assert_eq!(doc.tasks.len(), 1);
        assert_eq!(doc.tasks[0].description, "Practice scales");
    }
}
