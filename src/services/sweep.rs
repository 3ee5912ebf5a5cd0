//! Background overdue sweep

use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;

use crate::{config::ReservationsConfig, error::AppResult};

use super::reservations::ReservationsService;

/// Periodically marks approved reservations past their loan period as overdue
pub struct OverdueSweeper {
    reservations: ReservationsService,
    interval: Duration,
}

impl OverdueSweeper {
    pub fn new(reservations: ReservationsService, config: &ReservationsConfig) -> Self {
        Self {
            reservations,
            interval: Duration::from_secs(config.sweep_interval_secs.max(1)),
        }
    }

    /// One sweep as of now
    pub async fn run_cycle(&self) -> AppResult<u64> {
        self.reservations.run_overdue_sweep(Utc::now()).await
    }

    /// Spawn the sweep loop. The first cycle runs immediately.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.interval);

            loop {
                ticker.tick().await;

                match self.run_cycle().await {
                    Ok(0) => tracing::debug!("Overdue sweep found nothing"),
                    Ok(transitioned) => {
                        tracing::info!(transitioned, "Overdue sweep marked reservations")
                    }
                    Err(e) => tracing::warn!(error = %e, "Overdue sweep failed"),
                }
            }
        })
    }
}
