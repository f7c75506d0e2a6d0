use crate::application::services::BookingService;
use std::time::Duration;
use tracing::{error, info};

/// Periodically marks approved bookings from past days as completed
pub struct CompletionWorker {
    booking_service: BookingService,
    interval: Duration,
}

impl CompletionWorker {
    pub fn new(booking_service: BookingService, interval: Duration) -> Self {
        Self {
            booking_service,
            interval,
        }
    }

    pub async fn run(self) {
        info!("Starting CompletionWorker (every {:?})", self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.booking_service.complete_elapsed().await {
                error!("Failed to complete elapsed bookings: {}", e);
            }
        }
    }
}
