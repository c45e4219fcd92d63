#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use cuefinder_core::models::{
    booking::{Booking, BookingStatus, DEFAULT_GRACE_PERIOD_MINUTES},
    table::{MaintenanceStatus, Table, TableSize, TableStatus, TableType},
    venue::Venue,
};
use rust_decimal::Decimal;

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day().and_hms_opt(hour, minute, 0).unwrap())
}

pub fn booking(
    id: &str,
    tables: &[&str],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: BookingStatus,
    cost: i64,
) -> Booking {
    Booking {
        id: id.to_string(),
        venue_id: "v1".to_string(),
        user_id: "customer-1".to_string(),
        table_ids: tables.iter().map(|t| t.to_string()).collect(),
        start_time: start,
        end_time: end,
        party_size: 2,
        status,
        total_cost: Decimal::from(cost),
        deposit_amount: None,
        confirmation_code: format!("CF-{}", id.to_uppercase()),
        notes: None,
        special_requests: vec![],
        customer_name: Some("Test Customer".to_string()),
        customer_phone: None,
        customer_email: Some("customer@example.com".to_string()),
        cancellation_reason: None,
        no_show_fee: None,
        actual_start_time: None,
        grace_period_minutes: DEFAULT_GRACE_PERIOD_MINUTES,
        created_at: start,
        updated_at: start,
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
        location: Some("Main Floor".to_string()),
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
        table_count: 8,
        price_per_hour: Some(Decimal::from(20)),
        booking_enabled: false,
        is_active: true,
        owner_id: None,
        owner_email: None,
        claimed_at: None,
        verification_status: None,
        timezone: "UTC".to_string(),
    }
}
