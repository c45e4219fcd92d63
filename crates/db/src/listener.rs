use std::time::Duration;

use cuefinder_core::store::ChangeEvent;
use eyre::Result;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::DbPool;

/// Channel the schema triggers notify on.
pub const CHANGE_CHANNEL: &str = "cuefinder_changes";

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Forwards row-change notifications from Postgres into `sender`.
///
/// The listener reconnects on its own after a dropped connection;
/// notifications sent while it was down are lost.
pub async fn spawn_change_listener(
    pool: &DbPool,
    sender: broadcast::Sender<ChangeEvent>,
) -> Result<JoinHandle<()>> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGE_CHANNEL).await?;
    info!("Listening for changes on {}", CHANGE_CHANNEL);

    Ok(tokio::spawn(async move {
        loop {
            match listener.recv().await {
                Ok(notification) => match ChangeEvent::decode(notification.payload()) {
                    Some(event) => {
                        debug!("Change notification: {}", notification.payload());
                        let _ = sender.send(event);
                    }
                    None => warn!("Ignoring malformed change payload: {}", notification.payload()),
                },
                Err(err) => {
                    error!("Change listener error: {}", err);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }))
}
