pub mod handler;

use flume::Sender;
use tracing::warn;

use crate::{event::events::Event, http::error::ApiError};

/// Turns a failed fetch into a bus event. A rejected token means the session
/// is over, since implicit grants cannot be refreshed.
pub fn report_fetch_error(tx: &Sender<Event>, what: &str, error: ApiError) {
    match error {
        ApiError::Unauthorized => {
            let _ = tx.send(Event::SessionRejected);
        }
        error => {
            warn!(error = %error, "Failed to fetch {}", what);
            let _ = tx.send(Event::FetchError(format!("Could not load {what}: {error}")));
        }
    }
}
