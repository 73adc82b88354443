//! Keep-alive pinger.
//!
//! Free-tier hosts put idle services to sleep; this periodic task pings the
//! service's own health endpoint and the deployed client every 10 minutes to
//! keep both warm. It starts at boot, is aborted at shutdown, and shares no
//! state with the screening pipeline.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::config::Config;

const PING_INTERVAL: Duration = Duration::from_secs(600);
const PING_TIMEOUT: Duration = Duration::from_secs(10);

pub fn spawn(config: &Config) -> JoinHandle<()> {
    let backend_url = format!("http://127.0.0.1:{}/health", config.port);
    let client_url = config.client_url.clone();

    tokio::spawn(async move {
        let client = match reqwest::Client::builder().timeout(PING_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                error!("failed to build keep-alive HTTP client: {e}");
                return;
            }
        };

        let mut ticker = tokio::time::interval(PING_INTERVAL);
        // The first tick fires immediately; skip it so pings start one
        // interval after boot.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            ping(&client, &backend_url).await;
            ping(&client, &client_url).await;
        }
    })
}

async fn ping(client: &reqwest::Client, url: &str) {
    match client.get(url).send().await {
        Ok(response) => debug!("keep-alive ping to {url} returned {}", response.status()),
        Err(e) => warn!("keep-alive ping to {url} failed: {e}"),
    }
}
