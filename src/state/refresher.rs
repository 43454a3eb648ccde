use crate::app::App;
use crate::state::messages::NetworkRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::interval;

/// Lineup re-check cadence while the app is open.
const SLATE_CHECK: Duration = Duration::from_secs(3 * 60);
/// News archive sweep cadence.
const NEWS_CHECK: Duration = Duration::from_secs(30 * 60);
pub const NEWS_WINDOW_DAYS: i64 = 3;

/// Periodic refresh driver. Only emits requests; whether a re-check
/// turns into an alert is decided when the response lands.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    app: Arc<Mutex<App>>,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, app: Arc<Mutex<App>>) -> Self {
        Self { network_requests, app }
    }

    pub async fn run(self) {
        let mut slate_interval = interval(SLATE_CHECK);
        let mut news_interval = interval(NEWS_CHECK);
        // Skip the immediate first ticks so startup loading isn't
        // double-triggered.
        slate_interval.tick().await;
        news_interval.tick().await;

        loop {
            tokio::select! {
                _ = slate_interval.tick() => {
                    let (enabled, date) = {
                        let guard = self.app.lock().await;
                        (guard.settings.auto_check, guard.state.slate.date)
                    };
                    if enabled {
                        let _ = self
                            .network_requests
                            .send(NetworkRequest::LoadSlate { date })
                            .await;
                    }
                }
                _ = news_interval.tick() => {
                    let _ = self
                        .network_requests
                        .send(NetworkRequest::RefreshNews { days: NEWS_WINDOW_DAYS })
                        .await;
                }
            }
        }
    }
}
