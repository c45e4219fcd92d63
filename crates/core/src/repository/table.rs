use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{DeskError, DeskResult};
use crate::models::table::{Table, TableStatus};
use crate::reconcile::Reconciliation;
use crate::store::{ChangeFeed, Collection, TableStore};
use crate::subscription::Subscription;

#[derive(Clone)]
pub struct TableRepository {
    store: Arc<dyn TableStore>,
    feed: Arc<dyn ChangeFeed>,
}

impl TableRepository {
    pub fn new(store: Arc<dyn TableStore>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { store, feed }
    }

    pub async fn list_tables(&self, venue_id: &str) -> DeskResult<Vec<Table>> {
        self.store.query_tables(venue_id).await
    }

    pub async fn get_table(&self, table_id: &str) -> DeskResult<Table> {
        self.store
            .get_table(table_id)
            .await?
            .ok_or_else(|| DeskError::NotFound(format!("Table with ID {} not found", table_id)))
    }

    /// Operator override. Maintenance can always be set and always be
    /// lifted; occupancy is never set by hand.
    pub async fn update_status(&self, table_id: &str, status: TableStatus) -> DeskResult<Table> {
        let current = self.get_table(table_id).await?;

        if current.status == status {
            debug!("Table {} already {}, nothing to write", table_id, status);
            return Ok(current);
        }

        let allowed = match status {
            TableStatus::Maintenance => true,
            TableStatus::Available => current.status == TableStatus::Maintenance,
            TableStatus::Occupied => false,
        };
        if !allowed {
            return Err(DeskError::invalid_transition(current.status, status));
        }

        let updated = self
            .store
            .update_table_status(table_id, status, None)
            .await?;
        info!("Table {} set {} -> {}", table_id, current.status, status);
        Ok(updated)
    }

    /// Writes the occupancy derived by the reconciler. Tables in
    /// maintenance keep their status. Returns the tables that changed.
    pub async fn apply_occupancy(
        &self,
        venue_id: &str,
        reconciliation: &Reconciliation,
    ) -> DeskResult<Vec<Table>> {
        let mut changed = Vec::new();

        for table in self.store.query_tables(venue_id).await? {
            let occupied_by = reconciliation
                .occupying_bookings
                .get(&table.id)
                .map(String::as_str);
            let derived = table.derived_status(occupied_by);
            let booking_id = match derived {
                TableStatus::Occupied => occupied_by,
                _ => None,
            };

            let unchanged =
                derived == table.status && table.current_booking_id.as_deref() == booking_id;
            if unchanged {
                continue;
            }
            if derived != table.status && !table.status.can_transition(derived) {
                continue;
            }

            debug!(
                "Table {} occupancy {} -> {} ({:?})",
                table.id, table.status, derived, booking_id
            );
            changed.push(
                self.store
                    .update_table_status(&table.id, derived, booking_id)
                    .await?,
            );
        }

        Ok(changed)
    }

    /// Streams the venue's tables, re-delivered whenever any of them change.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<F>(&self, venue_id: &str, on_change: F) -> Subscription
    where
        F: Fn(DeskResult<Vec<Table>>) + Send + Sync + 'static,
    {
        let store = Arc::clone(&self.store);
        let venue = venue_id.to_string();

        let fetch = move || {
            let store = Arc::clone(&store);
            let venue = venue.clone();
            async move { store.query_tables(&venue).await }
        };

        Subscription::spawn(
            self.feed.changes(),
            Collection::Tables,
            venue_id.to_string(),
            fetch,
            Arc::new(on_change),
        )
    }
}
