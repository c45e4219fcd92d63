use async_trait::async_trait;
use cuefinder_core::errors::DeskResult;
use cuefinder_core::models::booking::{Booking, BookingStatus, StatusExtras};
use cuefinder_core::models::venue::{Venue, VenueClaim};
use cuefinder_core::store::{BookingQuery, BookingStore, ChangeEvent, ChangeFeed, VenueStore};
use mockall::mock;
use tokio::sync::broadcast;

// Mock stores for testing
mock! {
    pub Bookings {}

    #[async_trait]
    impl BookingStore for Bookings {
        async fn query_bookings(&self, query: &BookingQuery) -> DeskResult<Vec<Booking>>;

        async fn get_booking(&self, id: &str) -> DeskResult<Option<Booking>>;

        async fn update_booking_status(
            &self,
            id: &str,
            status: BookingStatus,
            extras: &StatusExtras,
        ) -> DeskResult<Booking>;
    }
}

mock! {
    pub Venues {}

    #[async_trait]
    impl VenueStore for Venues {
        async fn list_active_venues(&self, limit: usize) -> DeskResult<Vec<Venue>>;

        async fn get_venue(&self, id: &str) -> DeskResult<Option<Venue>>;

        async fn claim_venue(&self, id: &str, claim: &VenueClaim) -> DeskResult<Venue>;
    }
}

mock! {
    pub Feed {}

    impl ChangeFeed for Feed {
        fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
    }
}
