#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use cuefinder_core::models::{
    booking::{Booking, BookingStatus, DEFAULT_GRACE_PERIOD_MINUTES},
    table::{MaintenanceStatus, Table, TableSize, TableStatus, TableType},
    user::{User, UserRole},
    venue::{ClaimPolicy, Venue},
};
use cuefinder_core::directory::VenueDirectory;
use cuefinder_core::repository::{BookingRepository, TableRepository};
use cuefinder_db::memory::MemoryStore;
use rust_decimal::Decimal;

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub bookings: BookingRepository,
    pub tables: TableRepository,
    pub directory: VenueDirectory,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            bookings: BookingRepository::new(store.clone(), store.clone()),
            tables: TableRepository::new(store.clone(), store.clone()),
            directory: VenueDirectory::new(store.clone(), ClaimPolicy::AutoVerify),
            store,
        }
    }
}

pub fn booking(
    id: &str,
    tables: &[&str],
    start: DateTime<Utc>,
    minutes: i64,
    status: BookingStatus,
) -> Booking {
    Booking {
        id: id.to_string(),
        venue_id: "v1".to_string(),
        user_id: "customer-1".to_string(),
        table_ids: tables.iter().map(|t| t.to_string()).collect(),
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        party_size: 4,
        status,
        total_cost: Decimal::from(70),
        deposit_amount: None,
        confirmation_code: format!("CF-{}", id.to_uppercase()),
        notes: None,
        special_requests: vec![],
        customer_name: Some("Test Customer".to_string()),
        customer_phone: None,
        customer_email: None,
        cancellation_reason: None,
        no_show_fee: None,
        actual_start_time: None,
        grace_period_minutes: DEFAULT_GRACE_PERIOD_MINUTES,
        created_at: start - Duration::days(1),
        updated_at: start - Duration::days(1),
    }
}

pub fn table(id: &str, number: &str) -> Table {
    Table {
        id: id.to_string(),
        venue_id: "v1".to_string(),
        number: number.to_string(),
        size: TableSize::EightFoot,
        table_type: TableType::Standard,
        hourly_rate: Decimal::from(35),
        is_active: true,
        maintenance_status: MaintenanceStatus::Good,
        status: TableStatus::Available,
        current_booking_id: None,
        features: vec![],
        location: None,
    }
}

pub fn venue(id: &str, name: &str, address: &str) -> Venue {
    Venue {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: None,
        email: None,
        website: None,
        venue_type: "pool_hall".to_string(),
        table_count: 6,
        price_per_hour: None,
        booking_enabled: false,
        is_active: true,
        owner_id: None,
        owner_email: None,
        claimed_at: None,
        verification_status: None,
        timezone: "UTC".to_string(),
    }
}

pub fn user(id: &str, email: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        display_name: id.to_string(),
        role,
        owned_venue_ids: vec![],
        created_at: Utc::now(),
    }
}
