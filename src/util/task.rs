use std::collections::HashMap;

use tokio::task::JoinHandle;
use tracing::debug;

/// Background tasks keyed by purpose. Spawning under a key that is still
/// running aborts the older task, so only the newest result can arrive.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, key: &str, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key.to_string(), task) {
            if !handle.is_finished() {
                debug!(key, "Superseding running task");
            }
            handle.abort();
        }
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.tasks.get(key).is_some_and(|h| !h.is_finished())
    }

    pub fn abort(&mut self, key: &str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn newer_task_aborts_older_under_same_key() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = flume::unbounded();

        let slow_tx = tx.clone();
        tasks.spawn(
            "fetch",
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                let _ = slow_tx.send("old");
            }),
        );
        tasks.spawn(
            "fetch",
            tokio::spawn(async move {
                let _ = tx.send("new");
            }),
        );

        assert_eq!(rx.recv_async().await.unwrap(), "new");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn abort_all_stops_everything() {
        let mut tasks = TaskManager::new();
        tasks.spawn("a", tokio::spawn(std::future::pending()));
        tasks.spawn("b", tokio::spawn(std::future::pending()));
        assert!(tasks.is_running("a"));

        tasks.abort_all();
        assert!(!tasks.is_running("a"));
        assert!(!tasks.is_running("b"));
    }
}
