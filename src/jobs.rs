//! Background polling of the scraper job status.
//!
//! The admin screen keeps a poller alive while it is visible. Leaving the
//! screen stops the poller; the task is aborted rather than asked nicely so
//! an in-flight request cannot outlive the screen and publish a stale event.

use crate::api::ApiClient;
use crate::app::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Default)]
pub struct SyncPoller {
    handle: Option<JoinHandle<()>>,
}

impl SyncPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling every `interval`, fetching once immediately. A running
    /// poller is stopped first so at most one loop exists.
    pub fn start(
        &mut self,
        client: ApiClient,
        interval: Duration,
        events: UnboundedSender<AppEvent>,
    ) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let result = client.fetch_sync_status().await;
                if events.send(AppEvent::SyncStatusLoaded(result)).is_err() {
                    // Event loop is gone, nothing left to report to
                    return;
                }
            }
        }));
        debug!(interval_secs = interval.as_secs(), "sync poller started");
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("sync poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SyncPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/jobs/sync-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "platform": "ios", "status": "idle", "lastRunAt": null },
                    { "platform": "android", "status": "running", "lastRunAt": null }
                ]
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_poller_emits_status_events() {
        let server = mock_backend().await;
        let client = ApiClient::new(&format!("{}/api", server.uri()), None).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = SyncPoller::new();
        poller.start(client, Duration::from_millis(10), tx);

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("poller should emit within the timeout")
            .expect("channel should stay open");
        match event {
            AppEvent::SyncStatusLoaded(Ok(statuses)) => assert_eq!(statuses.len(), 2),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(poller.is_running());
    }

    #[tokio::test]
    async fn test_stop_halts_requests() {
        let server = mock_backend().await;
        let client = ApiClient::new(&format!("{}/api", server.uri()), None).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = SyncPoller::new();
        poller.start(client, Duration::from_millis(10), tx);
        // Wait for at least one round trip, then stop
        rx.recv().await.expect("first poll result");
        poller.stop();
        assert!(!poller.is_running());

        // Drain anything already queued, then confirm silence
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_loop() {
        let server = mock_backend().await;
        let client = ApiClient::new(&format!("{}/api", server.uri()), None).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = SyncPoller::new();
        poller.start(client.clone(), Duration::from_millis(10), tx.clone());
        poller.start(client, Duration::from_millis(10), tx);

        assert!(poller.is_running());
        assert!(rx.recv().await.is_some());
    }
}
