use chrono::{DateTime, Local};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::browser::Browser;
use crate::config::{Config, PollConfig};
use crate::error::{CycleError, VendorError};
use crate::notify::{Notifier, NotifyOutcome, NotifyState};
use crate::parsers::title_line;
use crate::vendors::VendorRegistry;

#[derive(Debug)]
pub struct VendorReport {
    pub vendor_name: String,
    pub result: Result<NotifyOutcome, VendorError>,
}

#[derive(Debug)]
pub struct CycleReport {
    pub started_at: DateTime<Local>,
    pub vendors: Vec<VendorReport>,
}

/// Scans every configured vendor, then sleeps, forever.
pub struct Poller {
    config: Arc<Config>,
    registry: VendorRegistry,
    browser: Box<dyn Browser>,
    notifier: Notifier,
}

impl Poller {
    pub fn new(
        config: Arc<Config>,
        registry: VendorRegistry,
        browser: Box<dyn Browser>,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            registry,
            browser,
            notifier,
        }
    }

    pub async fn run(&self) {
        let mut state = NotifyState::new();

        loop {
            let (next_state, result) = self.run_cycle(state).await;
            state = next_state;

            if let Err(e) = result {
                error!("Scan cycle skipped: {}", e);
            }

            let delay = sleep_duration(&self.config.poll, &mut rand::rng());
            info!("Next scan in {} seconds.", delay.as_secs());
            tokio::time::sleep(delay).await;
        }
    }

    /// One pass over all vendors. The notify state goes in and comes back out
    /// whether or not the cycle could run.
    pub async fn run_cycle(&self, mut state: NotifyState) -> (NotifyState, Result<CycleReport, CycleError>) {
        let started_at = Local::now();
        info!("--- Starting scan at {} ---", started_at.format("%Y-%m-%d %H:%M:%S"));

        let session = match self.browser.open_session().await {
            Ok(session) => session,
            Err(e) => return (state, Err(CycleError::Session(e))),
        };

        let mut vendors = Vec::with_capacity(self.config.vendors.len());
        for vendor_config in &self.config.vendors {
            info!("{}", title_line(&vendor_config.name));

            let result = match self.registry.scan(session.as_ref(), vendor_config).await {
                Ok(report) => {
                    info!("{} of {} listings in stock", report.in_stock_count(), report.len());
                    Ok(self.notifier.notify(&mut state, &vendor_config.name, &report).await)
                }
                Err(e) => {
                    error!("Error scanning {}: {}", vendor_config.name, e);
                    Err(e)
                }
            };

            vendors.push(VendorReport {
                vendor_name: vendor_config.name.clone(),
                result,
            });
        }

        (state, Ok(CycleReport { started_at, vendors }))
    }
}

/// `base_interval + U[jitter_min, jitter_max)` seconds.
pub fn sleep_duration<R: Rng + ?Sized>(poll: &PollConfig, rng: &mut R) -> Duration {
    let jitter = if poll.jitter_max_seconds > poll.jitter_min_seconds {
        rng.random_range(poll.jitter_min_seconds..poll.jitter_max_seconds)
    } else {
        poll.jitter_min_seconds
    };
    Duration::from_secs(poll.base_interval_seconds + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sleep_stays_within_jitter_range_plus_base() {
        let poll = PollConfig {
            base_interval_seconds: 100,
            jitter_min_seconds: 15,
            jitter_max_seconds: 30,
        };
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let secs = sleep_duration(&poll, &mut rng).as_secs();
            assert!((115..130).contains(&secs), "{secs} out of range");
        }
    }

    #[test]
    fn degenerate_range_uses_minimum() {
        let poll = PollConfig {
            base_interval_seconds: 5,
            jitter_min_seconds: 10,
            jitter_max_seconds: 10,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sleep_duration(&poll, &mut rng), Duration::from_secs(15));
    }
}
