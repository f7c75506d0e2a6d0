use crate::{
    domain::entities::Booking,
    domain::ports::{BookingNotice, BookingNotification, DirectoryRepository, NotificationSink, TaskSpawner},
};
use std::sync::Arc;
use tracing::Instrument;

/// Dispatches walker notifications in the background.
///
/// Delivery never blocks or fails the request that triggered it; errors are
/// logged and counted.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    directory: Arc<dyn DirectoryRepository>,
    spawner: Arc<dyn TaskSpawner>,
}

impl Notifier {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        directory: Arc<dyn DirectoryRepository>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            sink,
            directory,
            spawner,
        }
    }

    pub fn notify(&self, booking: Booking, notice: BookingNotice) {
        let sink = self.sink.clone();
        let directory = self.directory.clone();
        let span = tracing::info_span!(
            "notify_walker",
            booking_id = %booking.id,
            user_id = %booking.user_id,
            kind = %notice
        );

        self.spawner.spawn(Box::pin(
            async move {
                let walker = match directory.get_walker(&booking.user_id).await {
                    Ok(Some(walker)) => walker,
                    Ok(None) => {
                        tracing::warn!("Walker {} not found, notification dropped", booking.user_id);
                        return;
                    }
                    Err(e) => {
                        tracing::error!("Failed to load walker {}: {}", booking.user_id, e);
                        metrics::counter!("notifications_sent_total", "outcome" => "failure").increment(1);
                        return;
                    }
                };

                let notification = BookingNotification {
                    walker,
                    booking,
                    notice,
                };
                match sink.send(&notification).await {
                    Ok(()) => {
                        metrics::counter!("notifications_sent_total", "outcome" => "success").increment(1);
                    }
                    Err(e) => {
                        tracing::error!("Notification delivery failed: {}", e);
                        metrics::counter!("notifications_sent_total", "outcome" => "failure").increment(1);
                    }
                }
            }
            .instrument(span),
        ));
    }
}
